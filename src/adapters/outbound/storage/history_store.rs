use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use object_store::{
    Attribute, AttributeValue, Attributes, ObjectMeta, ObjectStore, PutOptions, PutPayload,
    path::Path as ObjectPath,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    adapters::outbound::storage::{
        config::ObjectStoreConfig, error::map_backend_error, signing::LinkSigner,
    },
    domain::{
        errors::{StorageError, StorageResult},
        models::{
            CurrentObject, DownloadAuthorization, DownloadLink, DownloadedObject, ObjectVersion,
            PutOutcome,
        },
        value_objects::{FileName, ObjectKey, OwnerId, VersionId},
    },
    ports::storage::VersionedObjectStore,
};

/// Current-version pointer kept next to the history of each file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HeadPointer {
    version_id: String,
    delete_marker: bool,
    updated_at: DateTime<Utc>,
}

impl HeadPointer {
    fn version(version_id: &VersionId) -> Self {
        Self {
            version_id: version_id.as_str().to_string(),
            delete_marker: false,
            updated_at: Utc::now(),
        }
    }

    fn delete_marker() -> Self {
        Self {
            version_id: VersionId::generate().as_str().to_string(),
            delete_marker: true,
            updated_at: Utc::now(),
        }
    }

    /// The content version this pointer makes current, if any
    fn current(&self) -> Option<&str> {
        (!self.delete_marker).then_some(self.version_id.as_str())
    }
}

/// Versioned file storage on top of any `object_store` backend.
///
/// Layout inside the backend:
///
/// ```text
/// {owner}/{name}                          current content, absent once deleted
/// {history_root}/{owner}/{name}/{version} every content version ever written
/// {head_root}/{owner}/{name}              JSON pointer to the current version
/// ```
///
/// Version ids are UUIDv7, so the history prefix lists oldest first and a
/// blob's `last_modified` is its creation time. Owner ids never start with
/// `.`, so the two internal roots cannot collide with an owner namespace.
pub struct HistoryObjectStore {
    inner: Arc<dyn ObjectStore>,
    config: ObjectStoreConfig,
    signer: LinkSigner,
}

impl HistoryObjectStore {
    pub fn new(inner: Arc<dyn ObjectStore>, config: ObjectStoreConfig) -> Self {
        let signer = LinkSigner::new(
            config.signing_secret.clone(),
            config.public_base_url.clone(),
        );
        Self {
            inner,
            config,
            signer,
        }
    }

    fn current_path(&self, key: &ObjectKey) -> ObjectPath {
        ObjectPath::from(key.as_str())
    }

    fn history_prefix(&self, key: &ObjectKey) -> ObjectPath {
        ObjectPath::from(format!("{}/{}", self.config.history_root, key))
    }

    fn version_path(&self, key: &ObjectKey, version_id: &VersionId) -> ObjectPath {
        self.history_prefix(key).child(version_id.as_str())
    }

    fn head_path(&self, key: &ObjectKey) -> ObjectPath {
        ObjectPath::from(format!("{}/{}", self.config.head_root, key))
    }

    fn put_options(&self, mime_type: Option<&str>) -> PutOptions {
        let mut attributes = Attributes::new();
        if let (true, Some(mime_type)) = (self.config.content_type_attributes, mime_type) {
            attributes.insert(
                Attribute::ContentType,
                AttributeValue::from(mime_type.to_string()),
            );
        }
        PutOptions {
            attributes,
            ..Default::default()
        }
    }

    /// Write `data` as history blob `version_id`, then as the current copy, then move the head
    async fn write_version(
        &self,
        key: &ObjectKey,
        version_id: &VersionId,
        data: Bytes,
        mime_type: Option<&str>,
    ) -> StorageResult<()> {
        let payload = PutPayload::from(data);

        self.inner
            .put_opts(
                &self.version_path(key, version_id),
                payload.clone(),
                self.put_options(mime_type),
            )
            .await
            .map_err(|e| map_backend_error(e, key, None))?;

        self.inner
            .put_opts(
                &self.current_path(key),
                payload,
                self.put_options(mime_type),
            )
            .await
            .map_err(|e| map_backend_error(e, key, None))?;

        self.write_head(key, &HeadPointer::version(version_id))
            .await
    }

    async fn write_head(&self, key: &ObjectKey, head: &HeadPointer) -> StorageResult<()> {
        let body = serde_json::to_vec(head).map_err(|e| StorageError::InternalError {
            message: format!("Failed to encode head pointer for {}: {}", key, e),
        })?;

        self.inner
            .put(&self.head_path(key), PutPayload::from(body))
            .await
            .map_err(|e| map_backend_error(e, key, None))?;

        Ok(())
    }

    async fn read_head(&self, key: &ObjectKey) -> StorageResult<Option<HeadPointer>> {
        let result = match self.inner.get(&self.head_path(key)).await {
            Ok(result) => result,
            Err(object_store::Error::NotFound { .. }) => return Ok(None),
            Err(e) => return Err(map_backend_error(e, key, None)),
        };

        let body = result
            .bytes()
            .await
            .map_err(|e| map_backend_error(e, key, None))?;

        serde_json::from_slice(&body)
            .map(Some)
            .map_err(|e| StorageError::InternalError {
                message: format!("Corrupt head pointer for {}: {}", key, e),
            })
    }

    async fn list_history(&self, key: &ObjectKey) -> StorageResult<Vec<ObjectMeta>> {
        self.inner
            .list(Some(&self.history_prefix(key)))
            .try_collect()
            .await
            .map_err(|e| map_backend_error(e, key, None))
    }
}

/// Name of a listed entry relative to an owner prefix, or `None` for entries
/// that are not files of that owner (namespace markers, foreign locations)
fn current_entry_name(location: &str, size: u64, prefix: &str) -> Option<String> {
    let relative = location.strip_prefix(prefix)?;
    if size == 0 && (relative.is_empty() || relative.ends_with('/')) {
        return None;
    }

    Some(
        urlencoding::decode(relative)
            .map(|name| name.into_owned())
            .unwrap_or_else(|_| relative.to_string()),
    )
}

#[async_trait]
impl VersionedObjectStore for HistoryObjectStore {
    async fn put(
        &self,
        owner: &OwnerId,
        name: &FileName,
        data: Bytes,
        mime_type: &str,
    ) -> StorageResult<PutOutcome> {
        let key = ObjectKey::for_file(owner, name);
        let version_id = VersionId::generate();
        let size_bytes = data.len() as u64;

        self.write_version(&key, &version_id, data, Some(mime_type))
            .await?;

        info!(
            bucket = %self.config.bucket,
            key = %key,
            version_id = %version_id,
            size_bytes,
            "Stored new version"
        );

        Ok(PutOutcome {
            version_id,
            stored_key: key,
            size_bytes,
        })
    }

    async fn list(&self, owner: &OwnerId) -> StorageResult<Vec<CurrentObject>> {
        let owner_path = ObjectPath::from(owner.as_str());
        let prefix = format!("{}/", owner_path.as_ref());

        let entries: Vec<ObjectMeta> = self
            .inner
            .list(Some(&owner_path))
            .try_collect()
            .await
            .map_err(|e| StorageError::StoreUnavailable {
                message: format!("Failed to list files for {}: {}", owner, e),
            })?;

        let objects = entries
            .into_iter()
            .filter_map(|meta| {
                let name = current_entry_name(meta.location.as_ref(), meta.size, &prefix);
                if name.is_none() {
                    debug!(location = %meta.location, "Skipping namespace marker");
                }
                name.map(|name| CurrentObject {
                    name,
                    size_bytes: meta.size,
                    last_modified: meta.last_modified,
                })
            })
            .collect();

        Ok(objects)
    }

    async fn list_versions(
        &self,
        owner: &OwnerId,
        name: &FileName,
    ) -> StorageResult<Vec<ObjectVersion>> {
        let key = ObjectKey::for_file(owner, name);
        let (history, head) =
            futures::try_join!(self.list_history(&key), self.read_head(&key))?;

        let prefix = format!("{}/", self.history_prefix(&key).as_ref());
        let current = head.as_ref().and_then(HeadPointer::current);

        let versions = history
            .into_iter()
            .filter_map(|meta| {
                let raw = meta.location.as_ref().strip_prefix(&prefix)?;
                match VersionId::new(raw.to_string()) {
                    Ok(version_id) => Some(ObjectVersion {
                        is_current: current == Some(version_id.as_str()),
                        version_id,
                        size_bytes: meta.size,
                        created_at: meta.last_modified,
                    }),
                    Err(e) => {
                        warn!(location = %meta.location, error = %e, "Ignoring unexpected history entry");
                        None
                    }
                }
            })
            .collect();

        Ok(versions)
    }

    async fn authorize_download(
        &self,
        owner: &OwnerId,
        name: &FileName,
        version_id: Option<&VersionId>,
    ) -> StorageResult<DownloadAuthorization> {
        let key = ObjectKey::for_file(owner, name);
        let path = match version_id {
            Some(version_id) => self.version_path(&key, version_id),
            None => self.current_path(&key),
        };

        self.inner
            .head(&path)
            .await
            .map_err(|e| map_backend_error(e, &key, version_id))?;

        let expires_in_seconds = self.config.download_expiry.as_secs();
        let expires = Utc::now().timestamp() + expires_in_seconds as i64;
        let url = self.signer.sign_url(owner, name, version_id, expires)?;

        debug!(key = %key, expires, "Issued download link");

        Ok(DownloadAuthorization {
            url,
            expires_in_seconds,
        })
    }

    async fn delete(&self, owner: &OwnerId, name: &FileName) -> StorageResult<()> {
        let key = ObjectKey::for_file(owner, name);

        match self.inner.delete(&self.current_path(&key)).await {
            Ok(()) | Err(object_store::Error::NotFound { .. }) => {}
            Err(e) => return Err(map_backend_error(e, &key, None)),
        }

        // Only names that were ever written get a marker
        match self.read_head(&key).await? {
            Some(head) if !head.delete_marker => {
                self.write_head(&key, &HeadPointer::delete_marker()).await?;
            }
            _ => {
                debug!(key = %key, "No current version to mark deleted");
                return Ok(());
            }
        }

        info!(bucket = %self.config.bucket, key = %key, "Removed current version");
        Ok(())
    }

    async fn restore(
        &self,
        owner: &OwnerId,
        name: &FileName,
        version_id: &VersionId,
    ) -> StorageResult<VersionId> {
        let key = ObjectKey::for_file(owner, name);

        let source = self
            .inner
            .get(&self.version_path(&key, version_id))
            .await
            .map_err(|e| map_backend_error(e, &key, Some(version_id)))?;
        let mime_type = source
            .attributes
            .get(&Attribute::ContentType)
            .map(|value| value.as_ref().to_string());
        let data = source
            .bytes()
            .await
            .map_err(|e| map_backend_error(e, &key, Some(version_id)))?;

        // The copy is a fresh write so that it becomes the newest version
        let new_version_id = VersionId::generate();
        self.write_version(&key, &new_version_id, data, mime_type.as_deref())
            .await?;

        info!(
            key = %key,
            restored_from = %version_id,
            new_version_id = %new_version_id,
            "Restored version"
        );

        Ok(new_version_id)
    }

    async fn open_download(&self, link: &DownloadLink) -> StorageResult<DownloadedObject> {
        self.signer.verify(link, Utc::now().timestamp())?;

        let key = ObjectKey::for_file(&link.owner, &link.name);
        let path = match &link.version_id {
            Some(version_id) => self.version_path(&key, version_id),
            None => self.current_path(&key),
        };

        let result = self
            .inner
            .get(&path)
            .await
            .map_err(|e| map_backend_error(e, &key, link.version_id.as_ref()))?;
        let content_type = result
            .attributes
            .get(&Attribute::ContentType)
            .map(|value| value.as_ref().to_string());
        let data = result
            .bytes()
            .await
            .map_err(|e| map_backend_error(e, &key, link.version_id.as_ref()))?;

        Ok(DownloadedObject {
            data,
            disposition: link.disposition.clone(),
            content_type,
            version_id: link.version_id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use object_store::{local::LocalFileSystem, memory::InMemory};

    fn store_with(inner: Arc<dyn ObjectStore>, content_type_attributes: bool) -> HistoryObjectStore {
        HistoryObjectStore::new(
            inner,
            ObjectStoreConfig {
                signing_secret: b"secret".to_vec(),
                content_type_attributes,
                ..Default::default()
            },
        )
    }

    fn owner(id: &str) -> OwnerId {
        OwnerId::new(id.to_string()).unwrap()
    }

    fn file(name: &str) -> FileName {
        FileName::new(name.to_string()).unwrap()
    }

    fn link_for(auth: &DownloadAuthorization, owner: &OwnerId, name: &FileName) -> DownloadLink {
        let query = auth.url.split_once('?').unwrap().1;
        let mut link = DownloadLink {
            owner: owner.clone(),
            name: name.clone(),
            version_id: None,
            expires: 0,
            disposition: String::new(),
            signature: String::new(),
        };
        for pair in query.split('&') {
            let (k, v) = pair.split_once('=').unwrap();
            let v = urlencoding::decode(v).unwrap().into_owned();
            match k {
                "versionId" => link.version_id = Some(VersionId::new(v).unwrap()),
                "expires" => link.expires = v.parse().unwrap(),
                "disposition" => link.disposition = v,
                "signature" => link.signature = v,
                _ => {}
            }
        }
        link
    }

    #[test]
    fn test_current_entry_name_skips_markers() {
        assert_eq!(current_entry_name("u1/", 0, "u1/"), None);
        assert_eq!(current_entry_name("u1/docs/", 0, "u1/"), None);
        assert_eq!(current_entry_name("u10/a.txt", 3, "u1/"), None);
        assert_eq!(
            current_entry_name("u1/empty.txt", 0, "u1/"),
            Some("empty.txt".to_string())
        );
        assert_eq!(
            current_entry_name("u1/a%25b.txt", 3, "u1/"),
            Some("a%b.txt".to_string())
        );
    }

    #[tokio::test]
    async fn test_put_keeps_every_version() {
        let store = store_with(Arc::new(InMemory::new()), true);
        let (u1, name) = (owner("u1"), file("a.txt"));

        let first = store
            .put(&u1, &name, Bytes::from_static(b"one"), "text/plain")
            .await
            .unwrap();
        let second = store
            .put(&u1, &name, Bytes::from_static(b"three"), "text/plain")
            .await
            .unwrap();
        assert_eq!(second.stored_key.as_str(), "u1/a.txt");
        assert_eq!(second.size_bytes, 5);

        let versions = store.list_versions(&u1, &name).await.unwrap();
        assert_eq!(versions.len(), 2);
        let current: Vec<_> = versions.iter().filter(|v| v.is_current).collect();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].version_id, second.version_id);
        assert!(versions.iter().any(|v| v.version_id == first.version_id && v.size_bytes == 3));

        let listed = store.list(&u1).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "a.txt");
        assert_eq!(listed[0].size_bytes, 5);
    }

    #[tokio::test]
    async fn test_list_is_owner_scoped_and_skips_markers() {
        let inner: Arc<dyn ObjectStore> = Arc::new(InMemory::new());
        let store = store_with(inner.clone(), true);

        inner
            .put(&ObjectPath::from("u1/"), PutPayload::from(Bytes::new()))
            .await
            .unwrap();
        store
            .put(&owner("u1"), &file("a.txt"), Bytes::from_static(b"a"), "text/plain")
            .await
            .unwrap();
        store
            .put(&owner("u10"), &file("b.txt"), Bytes::from_static(b"b"), "text/plain")
            .await
            .unwrap();

        let names: Vec<String> = store
            .list(&owner("u1"))
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.name)
            .collect();
        assert_eq!(names, vec!["a.txt".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_keeps_history_and_is_idempotent() {
        let store = store_with(Arc::new(InMemory::new()), true);
        let (u1, name) = (owner("u1"), file("a.txt"));

        store
            .put(&u1, &name, Bytes::from_static(b"a"), "text/plain")
            .await
            .unwrap();
        store.delete(&u1, &name).await.unwrap();
        store.delete(&u1, &name).await.unwrap();
        store.delete(&u1, &file("never.txt")).await.unwrap();

        assert!(store.list(&u1).await.unwrap().is_empty());
        let versions = store.list_versions(&u1, &name).await.unwrap();
        assert_eq!(versions.len(), 1);
        assert!(!versions[0].is_current);

        let err = store.authorize_download(&u1, &name, None).await.unwrap_err();
        assert!(matches!(err, StorageError::ObjectNotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_of_unknown_name_writes_nothing() {
        let inner = Arc::new(InMemory::new());
        let store = store_with(inner.clone(), true);
        let u1 = owner("u1");

        for i in 0..3 {
            store
                .delete(&u1, &file(&format!("ghost-{}.txt", i)))
                .await
                .unwrap();
        }

        let everything: Vec<ObjectMeta> = inner.list(None).try_collect().await.unwrap();
        assert!(everything.is_empty());
        assert!(store.list_versions(&u1, &file("ghost-0.txt")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_restore_writes_new_version_with_old_bytes() {
        let store = store_with(Arc::new(InMemory::new()), true);
        let (u1, name) = (owner("u1"), file("a.txt"));

        let v1 = store
            .put(&u1, &name, Bytes::from_static(b"first"), "text/markdown")
            .await
            .unwrap()
            .version_id;
        store
            .put(&u1, &name, Bytes::from_static(b"second"), "text/plain")
            .await
            .unwrap();

        let restored = store.restore(&u1, &name, &v1).await.unwrap();
        assert_ne!(restored, v1);

        let versions = store.list_versions(&u1, &name).await.unwrap();
        assert_eq!(versions.len(), 3);
        assert!(
            versions
                .iter()
                .any(|v| v.version_id == restored && v.is_current && v.size_bytes == 5)
        );

        let auth = store.authorize_download(&u1, &name, None).await.unwrap();
        let downloaded = store
            .open_download(&link_for(&auth, &u1, &name))
            .await
            .unwrap();
        assert_eq!(&downloaded.data[..], b"first");
        assert_eq!(downloaded.content_type.as_deref(), Some("text/markdown"));

        let missing = VersionId::generate();
        let err = store.restore(&u1, &name, &missing).await.unwrap_err();
        assert!(matches!(err, StorageError::VersionNotFound { .. }));
    }

    #[tokio::test]
    async fn test_pinned_download_serves_that_version() {
        let store = store_with(Arc::new(InMemory::new()), true);
        let (u1, name) = (owner("u1"), file("a.txt"));

        let v1 = store
            .put(&u1, &name, Bytes::from_static(b"old"), "text/plain")
            .await
            .unwrap()
            .version_id;
        store
            .put(&u1, &name, Bytes::from_static(b"new"), "text/plain")
            .await
            .unwrap();

        let auth = store
            .authorize_download(&u1, &name, Some(&v1))
            .await
            .unwrap();
        assert_eq!(auth.expires_in_seconds, 300);

        let link = link_for(&auth, &u1, &name);
        let downloaded = store.open_download(&link).await.unwrap();
        assert_eq!(&downloaded.data[..], b"old");
        assert_eq!(downloaded.disposition, "attachment; filename=\"a.txt\"");

        let mut forged = link.clone();
        forged.owner = owner("u2");
        assert!(matches!(
            store.open_download(&forged).await,
            Err(StorageError::InvalidDownloadLink { .. })
        ));
    }

    #[tokio::test]
    async fn test_local_filesystem_backend() {
        let dir = tempfile::tempdir().unwrap();
        let inner: Arc<dyn ObjectStore> =
            Arc::new(LocalFileSystem::new_with_prefix(dir.path()).unwrap());
        let store = store_with(inner, false);
        let (u1, name) = (owner("u1"), file("notes.md"));

        let v1 = store
            .put(&u1, &name, Bytes::from_static(b"draft"), "text/markdown")
            .await
            .unwrap()
            .version_id;
        store
            .put(&u1, &name, Bytes::from_static(b"final"), "text/markdown")
            .await
            .unwrap();
        let restored = store.restore(&u1, &name, &v1).await.unwrap();

        let versions = store.list_versions(&u1, &name).await.unwrap();
        assert_eq!(versions.len(), 3);
        assert!(versions.iter().any(|v| v.version_id == restored && v.is_current));

        store.delete(&u1, &name).await.unwrap();
        store.delete(&u1, &name).await.unwrap();
        assert!(store.list(&u1).await.unwrap().is_empty());
    }
}
