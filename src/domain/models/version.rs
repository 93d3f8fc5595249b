use chrono::{DateTime, Utc};

use crate::domain::value_objects::VersionId;

/// One stored version of a file as reported by the object store.
///
/// The store owns version identity and the current-version flag; listings
/// come back in store-native order.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectVersion {
    pub version_id: VersionId,
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
    pub is_current: bool,
}

/// A version with its read-time label ("V1", "V2", ...).
///
/// Labels are recomputed on every listing and never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledVersion {
    pub label: String,
    pub version_id: VersionId,
    pub last_modified: DateTime<Utc>,
    pub size: u64,
    pub is_latest: bool,
}
