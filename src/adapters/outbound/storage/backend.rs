//! Construction of the raw `object_store` backends
//!
//! The versioned layout in [`super::HistoryObjectStore`] works on any of
//! them; this module only knows how to connect.

use object_store::{
    ClientOptions, ObjectStore, aws::AmazonS3Builder, local::LocalFileSystem, memory::InMemory,
};
use std::{path::PathBuf, sync::Arc};

use crate::adapters::outbound::storage::config::ObjectStoreConfig;

/// Connection settings for an S3-compatible bucket
#[derive(Debug, Clone)]
pub struct S3Config {
    pub region: String,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    /// Custom endpoint for S3-compatible services (MinIO, LocalStack)
    pub endpoint: Option<String>,
    pub allow_http: bool,
}

/// Where file bytes live
#[derive(Debug, Clone, Default)]
pub enum StorageBackend {
    #[default]
    InMemory,
    LocalFileSystem { root: PathBuf },
    S3(S3Config),
}

impl StorageBackend {
    pub fn name(&self) -> &'static str {
        match self {
            StorageBackend::InMemory => "memory",
            StorageBackend::LocalFileSystem { .. } => "local",
            StorageBackend::S3(_) => "s3",
        }
    }

    /// Whether the backend persists object attributes such as `Content-Type`
    pub fn supports_attributes(&self) -> bool {
        !matches!(self, StorageBackend::LocalFileSystem { .. })
    }

    pub fn build(&self, config: &ObjectStoreConfig) -> object_store::Result<Arc<dyn ObjectStore>> {
        match self {
            StorageBackend::InMemory => Ok(Arc::new(InMemory::new())),
            StorageBackend::LocalFileSystem { root } => {
                std::fs::create_dir_all(root).map_err(|e| object_store::Error::Generic {
                    store: "LocalFileSystem",
                    source: Box::new(e),
                })?;
                Ok(Arc::new(LocalFileSystem::new_with_prefix(root)?))
            }
            StorageBackend::S3(s3) => create_s3_store(&config.bucket, s3, config),
        }
    }
}

/// Create an S3 store for `bucket`
pub fn create_s3_store(
    bucket: &str,
    s3: &S3Config,
    config: &ObjectStoreConfig,
) -> object_store::Result<Arc<dyn ObjectStore>> {
    let mut builder = AmazonS3Builder::new()
        .with_bucket_name(bucket)
        .with_region(&s3.region)
        .with_allow_http(s3.allow_http)
        .with_client_options(ClientOptions::new().with_timeout(config.request_timeout));

    if let Some(access_key) = &s3.access_key {
        builder = builder.with_access_key_id(access_key);
    }

    if let Some(secret_key) = &s3.secret_key {
        builder = builder.with_secret_access_key(secret_key);
    }

    if let Some(endpoint) = &s3.endpoint {
        builder = builder.with_endpoint(endpoint);
    }

    Ok(Arc::new(builder.build()?))
}
