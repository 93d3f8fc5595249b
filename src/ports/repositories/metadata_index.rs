use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    errors::MetadataResult,
    models::MetadataRecord,
    value_objects::{ObjectKey, OwnerId, VersionId},
};

/// Key-value cache of file attributes, keyed by (owner, file key).
///
/// This is never a source of truth. Implementations may fail freely; the
/// file service absorbs every error at the call site.
#[async_trait]
pub trait MetadataIndex: Send + Sync + 'static {
    /// Create or overwrite the record for a file
    async fn put(
        &self,
        owner: &OwnerId,
        file_key: &ObjectKey,
        record: &MetadataRecord,
    ) -> MetadataResult<()>;

    async fn get(
        &self,
        owner: &OwnerId,
        file_key: &ObjectKey,
    ) -> MetadataResult<Option<MetadataRecord>>;

    /// Remove the record; removing an absent record succeeds
    async fn delete(&self, owner: &OwnerId, file_key: &ObjectKey) -> MetadataResult<()>;

    /// Point the record at a new current version, keeping the other attributes.
    ///
    /// Creates a minimal record when none exists.
    async fn update_current_version(
        &self,
        owner: &OwnerId,
        file_key: &ObjectKey,
        version_id: &VersionId,
        at: DateTime<Utc>,
    ) -> MetadataResult<()>;
}
