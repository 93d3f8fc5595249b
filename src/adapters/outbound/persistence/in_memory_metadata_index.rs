use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{
    domain::{
        errors::MetadataResult,
        models::MetadataRecord,
        value_objects::{ObjectKey, OwnerId, VersionId},
    },
    ports::repositories::MetadataIndex,
};

/// In-memory implementation of MetadataIndex for testing and development
#[derive(Clone, Default)]
pub struct InMemoryMetadataIndex {
    // (owner id, file key) -> record
    records: Arc<RwLock<HashMap<(String, String), MetadataRecord>>>,
}

impl InMemoryMetadataIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

fn record_key(owner: &OwnerId, file_key: &ObjectKey) -> (String, String) {
    (owner.as_str().to_string(), file_key.as_str().to_string())
}

#[async_trait]
impl MetadataIndex for InMemoryMetadataIndex {
    async fn put(
        &self,
        owner: &OwnerId,
        file_key: &ObjectKey,
        record: &MetadataRecord,
    ) -> MetadataResult<()> {
        self.records
            .write()
            .await
            .insert(record_key(owner, file_key), record.clone());
        Ok(())
    }

    async fn get(
        &self,
        owner: &OwnerId,
        file_key: &ObjectKey,
    ) -> MetadataResult<Option<MetadataRecord>> {
        Ok(self
            .records
            .read()
            .await
            .get(&record_key(owner, file_key))
            .cloned())
    }

    async fn delete(&self, owner: &OwnerId, file_key: &ObjectKey) -> MetadataResult<()> {
        self.records
            .write()
            .await
            .remove(&record_key(owner, file_key));
        Ok(())
    }

    async fn update_current_version(
        &self,
        owner: &OwnerId,
        file_key: &ObjectKey,
        version_id: &VersionId,
        at: DateTime<Utc>,
    ) -> MetadataResult<()> {
        let mut records = self.records.write().await;
        let record = records
            .entry(record_key(owner, file_key))
            .or_insert_with(|| MetadataRecord {
                file_name: file_key.file_name().to_string(),
                current_version_id: None,
                size_bytes: None,
                mime_type: None,
                last_write_at: at,
            });

        record.current_version_id = Some(version_id.clone());
        record.last_write_at = at;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::FileName;

    fn key(owner: &OwnerId, name: &str) -> ObjectKey {
        ObjectKey::for_file(owner, &FileName::new(name.to_string()).unwrap())
    }

    #[tokio::test]
    async fn test_update_current_version_keeps_mime_type() {
        let index = InMemoryMetadataIndex::new();
        let owner = OwnerId::new("u1".to_string()).unwrap();
        let file_key = key(&owner, "a.txt");

        index
            .put(
                &owner,
                &file_key,
                &MetadataRecord {
                    file_name: "a.txt".to_string(),
                    current_version_id: Some(VersionId::generate()),
                    size_bytes: Some(3),
                    mime_type: Some("text/plain".to_string()),
                    last_write_at: Utc::now(),
                },
            )
            .await
            .unwrap();

        let restored = VersionId::generate();
        index
            .update_current_version(&owner, &file_key, &restored, Utc::now())
            .await
            .unwrap();

        let record = index.get(&owner, &file_key).await.unwrap().unwrap();
        assert_eq!(record.current_version_id, Some(restored));
        assert_eq!(record.mime_type.as_deref(), Some("text/plain"));
        assert_eq!(record.size_bytes, Some(3));
    }

    #[tokio::test]
    async fn test_records_are_owner_scoped() {
        let index = InMemoryMetadataIndex::new();
        let u1 = OwnerId::new("u1".to_string()).unwrap();
        let u2 = OwnerId::new("u2".to_string()).unwrap();

        index
            .update_current_version(&u1, &key(&u1, "a.txt"), &VersionId::generate(), Utc::now())
            .await
            .unwrap();

        assert!(index.get(&u2, &key(&u1, "a.txt")).await.unwrap().is_none());
        index.delete(&u2, &key(&u2, "a.txt")).await.unwrap();
        assert_eq!(index.len().await, 1);

        index.delete(&u1, &key(&u1, "a.txt")).await.unwrap();
        assert!(index.is_empty().await);
    }
}
