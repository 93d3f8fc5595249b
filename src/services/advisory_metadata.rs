use chrono::{DateTime, Utc};
use std::{future::Future, sync::Arc, time::Duration};
use tracing::warn;

use crate::{
    domain::{
        errors::{MetadataError, MetadataResult},
        models::MetadataRecord,
        value_objects::{ObjectKey, OwnerId, VersionId},
    },
    ports::repositories::MetadataIndex,
};

/// Error boundary around the metadata index.
///
/// Every call is bounded by `timeout`. Failures and timeouts are logged as
/// sync failures and discarded: writes return `()`, reads return `None`.
#[derive(Clone)]
pub struct AdvisoryMetadata {
    index: Arc<dyn MetadataIndex>,
    timeout: Duration,
}

impl AdvisoryMetadata {
    pub fn new(index: Arc<dyn MetadataIndex>, timeout: Duration) -> Self {
        Self { index, timeout }
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        owner: &OwnerId,
        key: &ObjectKey,
        call: impl Future<Output = MetadataResult<T>>,
    ) -> Option<T> {
        let outcome = match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(MetadataError::Timeout {
                millis: self.timeout.as_millis(),
            }),
        };

        match outcome {
            Ok(value) => Some(value),
            Err(e) => {
                let failure = MetadataError::sync_failure(e.to_string());
                warn!(
                    owner = %owner,
                    key = %key,
                    operation,
                    error = %failure,
                    "Metadata index call failed; continuing without it"
                );
                None
            }
        }
    }

    pub async fn record_write(&self, owner: &OwnerId, key: &ObjectKey, record: MetadataRecord) {
        self.bounded("put", owner, key, self.index.put(owner, key, &record))
            .await;
    }

    pub async fn lookup(&self, owner: &OwnerId, key: &ObjectKey) -> Option<MetadataRecord> {
        self.bounded("get", owner, key, self.index.get(owner, key))
            .await
            .flatten()
    }

    pub async fn forget(&self, owner: &OwnerId, key: &ObjectKey) {
        self.bounded("delete", owner, key, self.index.delete(owner, key))
            .await;
    }

    pub async fn record_current_version(
        &self,
        owner: &OwnerId,
        key: &ObjectKey,
        version_id: &VersionId,
        at: DateTime<Utc>,
    ) {
        self.bounded(
            "update_current_version",
            owner,
            key,
            self.index.update_current_version(owner, key, version_id, at),
        )
        .await;
    }
}
