use chrono::{DateTime, Utc};

use crate::domain::value_objects::VersionId;

/// Cached attributes of a file, keyed by (owner, file key) in the metadata index.
///
/// Only `mime_type` is not derivable from the object store; everything else
/// may be stale and is treated as a hint.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataRecord {
    pub file_name: String,
    pub current_version_id: Option<VersionId>,
    pub size_bytes: Option<u64>,
    pub mime_type: Option<String>,
    pub last_write_at: DateTime<Utc>,
}
