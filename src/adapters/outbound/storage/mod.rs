// Backend error mapping
pub mod error;

pub mod backend;
pub mod config;
pub mod history_store;
pub mod signing;

pub use backend::{S3Config, StorageBackend, create_s3_store};
pub use config::ObjectStoreConfig;
pub use history_store::HistoryObjectStore;
pub use signing::LinkSigner;
