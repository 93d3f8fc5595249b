use crate::domain::{
    errors::ValidationError,
    value_objects::{ObjectKey, VersionId},
};

/// Errors surfaced to callers of the file service.
///
/// Everything except `Validation` originates in the object store and is
/// authoritative: it is propagated unchanged up to the HTTP boundary.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StorageError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Object not found: {key}")]
    ObjectNotFound { key: ObjectKey },

    #[error("Version '{version_id}' not found for object: {key}")]
    VersionNotFound {
        key: ObjectKey,
        version_id: VersionId,
    },

    #[error("Storage quota exceeded: {message}")]
    QuotaExceeded { message: String },

    #[error("Object store unavailable: {message}")]
    StoreUnavailable { message: String },

    #[error("Invalid download link: {reason}")]
    InvalidDownloadLink { reason: String },

    #[error("Internal storage error: {message}")]
    InternalError { message: String },
}

impl StorageError {
    /// Short machine-readable name used in error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            StorageError::Validation(_) => "ValidationError",
            StorageError::ObjectNotFound { .. } | StorageError::VersionNotFound { .. } => {
                "NotFound"
            }
            StorageError::QuotaExceeded { .. } => "QuotaExceeded",
            StorageError::StoreUnavailable { .. } => "StoreUnavailable",
            StorageError::InvalidDownloadLink { .. } => "InvalidDownloadLink",
            StorageError::InternalError { .. } => "InternalError",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StorageError::ObjectNotFound { .. } | StorageError::VersionNotFound { .. }
        )
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
