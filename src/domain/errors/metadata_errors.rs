/// Failures of the metadata index.
///
/// These never leave the advisory boundary in the file service; callers of
/// the service only ever see them in logs.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("metadata sync failure: {message}")]
    SyncFailure { message: String },

    #[error("metadata call timed out after {millis} ms")]
    Timeout { millis: u128 },

    #[error("metadata backend error: {0}")]
    Backend(#[from] sqlx::Error),
}

impl MetadataError {
    pub fn sync_failure(message: impl Into<String>) -> Self {
        MetadataError::SyncFailure {
            message: message.into(),
        }
    }
}

pub type MetadataResult<T> = Result<T, MetadataError>;
