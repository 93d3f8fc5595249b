use async_trait::async_trait;
use chrono::Utc;
use futures::future::join_all;
use std::{sync::Arc, time::Duration};
use tracing::{error, info};

use crate::{
    domain::{
        errors::{StorageResult, ValidationError},
        models::{
            CurrentObject, DEFAULT_MIME_TYPE, DeleteReceipt, DownloadAuthorization, DownloadLink,
            DownloadRequest, DownloadedObject, FileListing, FileRequest, LabeledVersion,
            MetadataRecord, RestoreReceipt, RestoreRequest, UploadReceipt, UploadRequest,
        },
        value_objects::{FileName, ObjectKey, OwnerId, VersionId},
    },
    ports::{repositories::MetadataIndex, services::FileService, storage::VersionedObjectStore},
    services::{advisory_metadata::AdvisoryMetadata, version_reconciler::reconcile},
};

const MIB: u64 = 1024 * 1024;

#[derive(Debug, Clone)]
pub struct FileServiceConfig {
    /// Largest accepted upload in bytes
    pub max_upload_bytes: u64,
    /// Upper bound on any single metadata index call
    pub metadata_timeout: Duration,
}

impl Default for FileServiceConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: 50 * MIB,
            metadata_timeout: Duration::from_secs(2),
        }
    }
}

/// Orchestrates the object store (authoritative) and the metadata index (advisory).
///
/// The store call always runs first and its outcome decides the result. The
/// metadata step only runs after a store success and can never change it.
#[derive(Clone)]
pub struct FileServiceImpl {
    store: Arc<dyn VersionedObjectStore>,
    metadata: AdvisoryMetadata,
    config: FileServiceConfig,
}

impl FileServiceImpl {
    pub fn new(
        store: Arc<dyn VersionedObjectStore>,
        index: Arc<dyn MetadataIndex>,
        config: FileServiceConfig,
    ) -> Self {
        Self {
            metadata: AdvisoryMetadata::new(index, config.metadata_timeout),
            store,
            config,
        }
    }

    /// Attach cached attributes to one listed file; any miss leaves it as listed
    async fn enrich(&self, owner: &OwnerId, object: CurrentObject) -> FileListing {
        let Ok(name) = FileName::new(object.name.clone()) else {
            return object.into();
        };
        let key = ObjectKey::for_file(owner, &name);
        let mut listing = FileListing::from(object);

        if let Some(record) = self.metadata.lookup(owner, &key).await {
            listing.mime_type = Some(
                record
                    .mime_type
                    .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string()),
            );
            listing.current_version_id = record.current_version_id;
            listing.uploaded_at = Some(record.last_write_at);
        }

        listing
    }
}

#[async_trait]
impl FileService for FileServiceImpl {
    async fn upload(&self, request: UploadRequest) -> StorageResult<UploadReceipt> {
        let file = request.file.ok_or(ValidationError::MissingFile)?;
        let name = FileName::new(file.name)?;

        let size = file.data.len() as u64;
        if size > self.config.max_upload_bytes {
            return Err(ValidationError::PayloadTooLarge {
                size,
                limit_mb: self.config.max_upload_bytes / MIB,
            }
            .into());
        }

        let mime_type = file
            .mime_type
            .filter(|mime| !mime.is_empty())
            .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string());

        let outcome = self
            .store
            .put(&request.owner, &name, file.data, &mime_type)
            .await
            .inspect_err(|e| error!(owner = %request.owner, file = %name, error = %e, "Upload failed"))?;

        self.metadata
            .record_write(
                &request.owner,
                &outcome.stored_key,
                MetadataRecord {
                    file_name: name.as_str().to_string(),
                    current_version_id: Some(outcome.version_id.clone()),
                    size_bytes: Some(size),
                    mime_type: Some(mime_type.clone()),
                    last_write_at: Utc::now(),
                },
            )
            .await;

        info!(owner = %request.owner, key = %outcome.stored_key, version_id = %outcome.version_id, "File uploaded");

        Ok(UploadReceipt {
            name,
            size,
            mime_type,
            version_id: outcome.version_id,
            key: outcome.stored_key,
        })
    }

    async fn list(&self, owner: &OwnerId) -> StorageResult<Vec<FileListing>> {
        let objects = self
            .store
            .list(owner)
            .await
            .inspect_err(|e| error!(owner = %owner, error = %e, "Listing failed"))?;

        Ok(join_all(objects.into_iter().map(|object| self.enrich(owner, object))).await)
    }

    async fn download(&self, request: DownloadRequest) -> StorageResult<DownloadAuthorization> {
        let name = FileName::required(request.name)?;
        let version_id = request
            .version_id
            .filter(|v| !v.is_empty())
            .map(VersionId::new)
            .transpose()?;

        self.store
            .authorize_download(&request.owner, &name, version_id.as_ref())
            .await
            .inspect_err(|e| error!(owner = %request.owner, file = %name, error = %e, "Download authorization failed"))
    }

    async fn delete(&self, request: FileRequest) -> StorageResult<DeleteReceipt> {
        let name = FileName::required(request.name)?;
        let key = ObjectKey::for_file(&request.owner, &name);

        self.store
            .delete(&request.owner, &name)
            .await
            .inspect_err(|e| error!(key = %key, error = %e, "Delete failed"))?;

        self.metadata.forget(&request.owner, &key).await;

        info!(key = %key, "File deleted");
        Ok(DeleteReceipt { deleted: true, key })
    }

    async fn list_versions(&self, request: FileRequest) -> StorageResult<Vec<LabeledVersion>> {
        let name = FileName::required(request.name)?;

        let versions = self
            .store
            .list_versions(&request.owner, &name)
            .await
            .inspect_err(|e| error!(owner = %request.owner, file = %name, error = %e, "Version listing failed"))?;

        Ok(reconcile(versions))
    }

    async fn restore(&self, request: RestoreRequest) -> StorageResult<RestoreReceipt> {
        let name = FileName::required(request.name)?;
        let version_id = VersionId::required(request.version_id)?;
        let key = ObjectKey::for_file(&request.owner, &name);

        let new_version_id = self
            .store
            .restore(&request.owner, &name, &version_id)
            .await
            .inspect_err(|e| error!(key = %key, version_id = %version_id, error = %e, "Restore failed"))?;

        self.metadata
            .record_current_version(&request.owner, &key, &new_version_id, Utc::now())
            .await;

        Ok(RestoreReceipt {
            new_version_id,
            restored_from_version_id: version_id,
        })
    }

    async fn open_download(&self, link: DownloadLink) -> StorageResult<DownloadedObject> {
        self.store.open_download(&link).await
    }
}

/// Builder for FileServiceImpl
#[derive(Default)]
pub struct FileServiceBuilder {
    store: Option<Arc<dyn VersionedObjectStore>>,
    index: Option<Arc<dyn MetadataIndex>>,
    config: FileServiceConfig,
}

impl FileServiceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(mut self, store: Arc<dyn VersionedObjectStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn metadata_index(mut self, index: Arc<dyn MetadataIndex>) -> Self {
        self.index = Some(index);
        self
    }

    pub fn config(mut self, config: FileServiceConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<FileServiceImpl, &'static str> {
        let store = self.store.ok_or("Store is required")?;
        let index = self.index.ok_or("Metadata index is required")?;
        if self.config.max_upload_bytes == 0 {
            return Err("Upload limit must be positive");
        }

        Ok(FileServiceImpl::new(store, index, self.config))
    }
}
