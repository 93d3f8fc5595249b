use async_trait::async_trait;

use crate::domain::{
    errors::StorageResult,
    models::{
        DeleteReceipt, DownloadAuthorization, DownloadLink, DownloadRequest, DownloadedObject,
        FileListing, FileRequest, LabeledVersion, RestoreReceipt, RestoreRequest, UploadReceipt,
        UploadRequest,
    },
    value_objects::OwnerId,
};

/// Service port for the per-user file operations exposed to the routing layer.
///
/// Requests carry an already authenticated owner. Missing or malformed
/// identifying parameters fail with a validation error before any store call.
#[async_trait]
pub trait FileService: Send + Sync + 'static {
    async fn upload(&self, request: UploadRequest) -> StorageResult<UploadReceipt>;

    async fn list(&self, owner: &OwnerId) -> StorageResult<Vec<FileListing>>;

    async fn download(&self, request: DownloadRequest) -> StorageResult<DownloadAuthorization>;

    async fn delete(&self, request: FileRequest) -> StorageResult<DeleteReceipt>;

    async fn list_versions(&self, request: FileRequest) -> StorageResult<Vec<LabeledVersion>>;

    async fn restore(&self, request: RestoreRequest) -> StorageResult<RestoreReceipt>;

    /// Resolve a signed download link presented to the gateway
    async fn open_download(&self, link: DownloadLink) -> StorageResult<DownloadedObject>;
}
