pub mod repositories;
pub mod services;
pub mod storage;

// Re-export all port traits for convenience
pub use repositories::MetadataIndex;
pub use services::FileService;
pub use storage::VersionedObjectStore;
