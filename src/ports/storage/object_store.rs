use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::{
    errors::StorageResult,
    models::{
        CurrentObject, DownloadAuthorization, DownloadLink, DownloadedObject, ObjectVersion,
        PutOutcome,
    },
    value_objects::{FileName, OwnerId, VersionId},
};

/// Port for the versioned blob store holding file contents.
///
/// The store is the source of truth for existence, size and version history.
/// Every error returned here is authoritative and must reach the caller
/// unchanged.
#[async_trait]
pub trait VersionedObjectStore: Send + Sync + 'static {
    /// Store `data` as a new current version; earlier versions are retained
    async fn put(
        &self,
        owner: &OwnerId,
        name: &FileName,
        data: Bytes,
        mime_type: &str,
    ) -> StorageResult<PutOutcome>;

    /// Current version of every file in the owner's namespace
    async fn list(&self, owner: &OwnerId) -> StorageResult<Vec<CurrentObject>>;

    /// All content versions of one file in store-native order, delete markers excluded
    async fn list_versions(
        &self,
        owner: &OwnerId,
        name: &FileName,
    ) -> StorageResult<Vec<ObjectVersion>>;

    /// Issue a time-limited link to the current version, or to `version_id`
    async fn authorize_download(
        &self,
        owner: &OwnerId,
        name: &FileName,
        version_id: Option<&VersionId>,
    ) -> StorageResult<DownloadAuthorization>;

    /// Remove the current version pointer; deleting an absent file succeeds
    async fn delete(&self, owner: &OwnerId, name: &FileName) -> StorageResult<()>;

    /// Copy the bytes of `version_id` into a brand-new current version
    async fn restore(
        &self,
        owner: &OwnerId,
        name: &FileName,
        version_id: &VersionId,
    ) -> StorageResult<VersionId>;

    /// Verify a link issued by `authorize_download` and fetch the bytes it references
    async fn open_download(&self, link: &DownloadLink) -> StorageResult<DownloadedObject>;
}
