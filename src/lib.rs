pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;
pub mod services;

// Re-export key types for convenience

// Domain types - value objects, models and errors
pub use domain::{
    // Models
    DownloadAuthorization,
    DownloadLink,
    FileListing,
    LabeledVersion,
    MetadataError,
    MetadataRecord,
    // Value objects
    FileName,
    ObjectKey,
    ObjectVersion,
    OwnerId,
    // Errors
    StorageError,
    ValidationError,
    VersionId,
};

// Port types - interfaces for external systems
pub use ports::{FileService, MetadataIndex, VersionedObjectStore};

// Service implementations - business logic
pub use services::{FileServiceBuilder, FileServiceConfig, FileServiceImpl, reconcile};

// Application factory and configuration
pub use app::{AppBuilder, AppConfig, AppDependencies, AppError, AppServices, create_in_memory_app};

// Adapter types - infrastructure implementations
pub use adapters::inbound::http::{AppState, HttpConfig, create_router};
pub use adapters::outbound::{
    persistence::{InMemoryMetadataIndex, MetadataBackend, MetadataIndexConfig, SqlMetadataIndex},
    storage::{HistoryObjectStore, LinkSigner, ObjectStoreConfig, S3Config, StorageBackend},
};

// Public facade for easy construction
pub mod prelude {
    pub use crate::{
        AppBuilder, AppServices, FileName, FileService, FileServiceImpl, HistoryObjectStore,
        InMemoryMetadataIndex, MetadataIndex, ObjectKey, OwnerId, StorageBackend, VersionId,
        VersionedObjectStore, create_in_memory_app,
    };
}
