mod in_memory_metadata_index;
mod sql_metadata_index;

pub use in_memory_metadata_index::InMemoryMetadataIndex;
pub use sql_metadata_index::SqlMetadataIndex;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::{str::FromStr, sync::Arc};

use crate::{domain::errors::MetadataError, ports::repositories::MetadataIndex};

/// Where the metadata index keeps its records
#[derive(Debug, Clone)]
pub enum MetadataBackend {
    InMemory,
    Sqlite { url: String },
}

#[derive(Debug, Clone)]
pub struct MetadataIndexConfig {
    pub backend: MetadataBackend,
    pub table_name: String,
    pub max_connections: u32,
}

impl Default for MetadataIndexConfig {
    fn default() -> Self {
        Self {
            backend: MetadataBackend::InMemory,
            table_name: "FileMetadata".to_string(),
            max_connections: 5,
        }
    }
}

/// Connect the configured index, creating its table if needed
pub async fn connect_metadata_index(
    config: &MetadataIndexConfig,
) -> Result<Arc<dyn MetadataIndex>, MetadataError> {
    match &config.backend {
        MetadataBackend::InMemory => Ok(Arc::new(InMemoryMetadataIndex::new())),
        MetadataBackend::Sqlite { url } => {
            let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
            let pool = SqlitePoolOptions::new()
                .max_connections(config.max_connections)
                .connect_with(options)
                .await?;

            let index = SqlMetadataIndex::new(pool, config.table_name.clone())
                .map_err(|e| MetadataError::sync_failure(e.to_string()))?;
            index.migrate().await?;
            Ok(Arc::new(index))
        }
    }
}
