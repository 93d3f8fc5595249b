use axum::Router;
use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    adapters::{
        inbound::http::{AppState, HttpConfig, create_router},
        outbound::{
            persistence::{MetadataBackend, MetadataIndexConfig, connect_metadata_index},
            storage::{HistoryObjectStore, ObjectStoreConfig, StorageBackend},
        },
    },
    domain::errors::MetadataError,
    ports::{repositories::MetadataIndex, services::FileService, storage::VersionedObjectStore},
    services::{FileServiceBuilder, FileServiceConfig},
};

/// Configuration for the application
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub storage_backend: StorageBackend,
    pub object_store: ObjectStoreConfig,
    pub metadata: MetadataIndexConfig,
    pub file_service: FileServiceConfig,
    pub http: HttpConfig,
}

/// Application dependencies container
pub struct AppDependencies {
    pub object_store: Arc<dyn VersionedObjectStore>,
    pub metadata_index: Arc<dyn MetadataIndex>,
}

/// Application services container
pub struct AppServices {
    pub file_service: Arc<dyn FileService>,
    pub http: HttpConfig,
}

impl AppServices {
    /// The full HTTP surface over these services
    pub fn router(&self) -> Router {
        let state = AppState::new(self.file_service.clone(), &self.http);
        create_router(state, &self.http)
    }
}

/// Application builder for dependency injection
pub struct AppBuilder {
    config: AppConfig,
}

impl AppBuilder {
    /// Create a new application builder
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    /// Configure the application with custom settings
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Configure storage backend
    pub fn with_storage_backend(mut self, backend: StorageBackend) -> Self {
        self.config.storage_backend = backend;
        self
    }

    /// Configure metadata index backend
    pub fn with_metadata_backend(mut self, backend: MetadataBackend) -> Self {
        self.config.metadata.backend = backend;
        self
    }

    pub fn with_object_store_config(mut self, config: ObjectStoreConfig) -> Self {
        self.config.object_store = config;
        self
    }

    pub fn with_file_service_config(mut self, config: FileServiceConfig) -> Self {
        self.config.file_service = config;
        self
    }

    pub fn with_http_config(mut self, config: HttpConfig) -> Self {
        self.config.http = config;
        self
    }

    /// Build the application dependencies
    pub async fn build_dependencies(&self) -> Result<AppDependencies, AppError> {
        let object_store = self.create_object_store()?;
        let metadata_index = connect_metadata_index(&self.config.metadata).await?;

        Ok(AppDependencies {
            object_store,
            metadata_index,
        })
    }

    /// Build the complete application with services
    pub async fn build(self) -> Result<AppServices, AppError> {
        let deps = self.build_dependencies().await?;

        let file_service = FileServiceBuilder::new()
            .store(deps.object_store)
            .metadata_index(deps.metadata_index)
            .config(self.config.file_service.clone())
            .build()
            .map_err(|message| AppError::Configuration {
                message: message.to_string(),
            })?;

        Ok(AppServices {
            file_service: Arc::new(file_service),
            http: self.config.http,
        })
    }

    fn create_object_store(&self) -> Result<Arc<dyn VersionedObjectStore>, AppError> {
        let backend = &self.config.storage_backend;
        let mut config = self.config.object_store.clone();
        config.content_type_attributes = backend.supports_attributes();

        if config.signing_secret.is_empty() {
            warn!("No signing secret configured; download links will not survive a restart");
            config.signing_secret = random_secret();
        }

        let inner = backend
            .build(&config)
            .map_err(|e| AppError::StorageInit {
                message: e.to_string(),
            })?;

        info!(backend = backend.name(), bucket = %config.bucket, "Object store ready");
        Ok(Arc::new(HistoryObjectStore::new(inner, config)))
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 32 random bytes for a per-process signing key
fn random_secret() -> Vec<u8> {
    let mut secret = uuid::Uuid::new_v4().as_bytes().to_vec();
    secret.extend_from_slice(uuid::Uuid::new_v4().as_bytes());
    secret
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Storage initialization error: {message}")]
    StorageInit { message: String },

    #[error("Metadata index initialization error: {0}")]
    MetadataInit(#[from] MetadataError),
}

/// Create an in-memory application for testing and development
pub async fn create_in_memory_app() -> Result<AppServices, AppError> {
    AppBuilder::new()
        .with_storage_backend(StorageBackend::InMemory)
        .with_metadata_backend(MetadataBackend::InMemory)
        .build()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_in_memory_app() {
        let app = create_in_memory_app().await.unwrap();
        let files = app
            .file_service
            .list(&crate::domain::value_objects::OwnerId::new("u1".to_string()).unwrap())
            .await
            .unwrap();
        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn test_sqlite_metadata_backend() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("metadata.db").display());

        let deps = AppBuilder::new()
            .with_metadata_backend(MetadataBackend::Sqlite { url })
            .build_dependencies()
            .await
            .unwrap();

        let owner = crate::domain::value_objects::OwnerId::new("u1".to_string()).unwrap();
        let key = crate::domain::value_objects::ObjectKey::for_file(
            &owner,
            &crate::domain::value_objects::FileName::new("a.txt".to_string()).unwrap(),
        );
        let version = crate::domain::value_objects::VersionId::generate();
        deps.metadata_index
            .update_current_version(&owner, &key, &version, chrono::Utc::now())
            .await
            .unwrap();
        let record = deps.metadata_index.get(&owner, &key).await.unwrap().unwrap();
        assert_eq!(record.current_version_id, Some(version));
    }

    #[tokio::test]
    async fn test_invalid_table_name_is_rejected() {
        let mut config = AppConfig::default();
        config.metadata = MetadataIndexConfig {
            backend: MetadataBackend::Sqlite {
                url: "sqlite::memory:".to_string(),
            },
            table_name: "bad-name".to_string(),
            max_connections: 1,
        };

        let result = AppBuilder::new().with_config(config).build().await;
        assert!(matches!(result, Err(AppError::MetadataInit(_))));
    }

    #[tokio::test]
    async fn test_zero_upload_limit_is_a_configuration_error() {
        let result = AppBuilder::new()
            .with_file_service_config(FileServiceConfig {
                max_upload_bytes: 0,
                ..Default::default()
            })
            .build()
            .await;
        assert!(matches!(result, Err(AppError::Configuration { .. })));
    }
}
