use std::time::Duration;

/// Settings for the versioned object store adapter.
///
/// Injected once at construction; the adapter never reads the environment.
#[derive(Debug, Clone)]
pub struct ObjectStoreConfig {
    /// Bucket name, used by the S3 backend and in log lines
    pub bucket: String,
    /// Root under which every version blob is kept: `{history_root}/{owner}/{name}/{versionId}`
    pub history_root: String,
    /// Root of the current-version pointers: `{head_root}/{owner}/{name}`
    pub head_root: String,
    /// Base URL of this server as seen by browsers, used in download links
    pub public_base_url: String,
    pub signing_secret: Vec<u8>,
    pub download_expiry: Duration,
    /// Per-request timeout for remote backends
    pub request_timeout: Duration,
    /// Whether the backend can persist a `Content-Type` attribute
    pub content_type_attributes: bool,
}

impl Default for ObjectStoreConfig {
    fn default() -> Self {
        Self {
            bucket: "file-vault".to_string(),
            history_root: ".versions".to_string(),
            head_root: ".heads".to_string(),
            public_base_url: "http://localhost:5000".to_string(),
            signing_secret: Vec::new(),
            download_expiry: Duration::from_secs(300),
            request_timeout: Duration::from_secs(30),
            content_type_attributes: true,
        }
    }
}
