use anyhow::{Context, Result};
use axum::http::HeaderValue;
use clap::Parser;
use file_vault::{
    adapters::{
        inbound::http::HttpConfig,
        outbound::{
            persistence::{MetadataBackend, MetadataIndexConfig},
            storage::{ObjectStoreConfig, S3Config, StorageBackend},
        },
    },
    app::{AppBuilder, AppConfig},
    services::FileServiceConfig,
};
use std::{net::SocketAddr, path::PathBuf, time::Duration};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "file-vault-server")]
#[command(about = "Per-user versioned file storage API", long_about = None)]
struct Cli {
    /// Server port to listen on
    #[arg(short, long, env = "PORT", default_value = "5000")]
    port: u16,

    /// Server host to bind to
    #[arg(long, env = "SERVER_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Storage backend type (memory, local, s3)
    #[arg(long, env = "STORAGE_BACKEND", default_value = "memory")]
    storage_backend: String,

    /// Root directory for the local backend
    #[arg(long, env = "LOCAL_STORAGE_ROOT", default_value = "./data")]
    local_root: PathBuf,

    /// S3 bucket name
    #[arg(long, env = "S3_BUCKET", default_value = "file-vault")]
    s3_bucket: String,

    /// S3 region
    #[arg(long, env = "AWS_REGION", default_value = "us-east-1")]
    s3_region: String,

    /// S3 endpoint URL (for MinIO or other S3-compatible services)
    #[arg(long, env = "S3_ENDPOINT")]
    s3_endpoint: Option<String>,

    /// S3 access key
    #[arg(long, env = "AWS_ACCESS_KEY_ID")]
    s3_access_key: Option<String>,

    /// S3 secret key
    #[arg(long, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    s3_secret_key: Option<String>,

    /// Allow plain HTTP to the S3 endpoint
    #[arg(long, env = "S3_ALLOW_HTTP", default_value = "false")]
    s3_allow_http: bool,

    /// Root of the version history inside the bucket
    #[arg(long, env = "HISTORY_ROOT", default_value = ".versions")]
    history_root: String,

    /// Root of the current-version pointers inside the bucket
    #[arg(long, env = "HEAD_ROOT", default_value = ".heads")]
    head_root: String,

    /// Base URL browsers use to reach this server, embedded in download links
    #[arg(long, env = "PUBLIC_BASE_URL", default_value = "http://localhost:5000")]
    public_base_url: String,

    /// Secret for signing download links (random per process when unset)
    #[arg(long, env = "LINK_SIGNING_SECRET", hide_env_values = true)]
    signing_secret: Option<String>,

    /// Download link lifetime in seconds
    #[arg(long, env = "LINK_EXPIRY_SECONDS", default_value = "300")]
    link_expiry_seconds: u64,

    /// Per-request timeout for remote storage, in seconds
    #[arg(long, env = "STORAGE_TIMEOUT_SECONDS", default_value = "30")]
    storage_timeout_seconds: u64,

    /// Metadata index backend (memory, sqlite)
    #[arg(long, env = "METADATA_BACKEND", default_value = "memory")]
    metadata_backend: String,

    /// Database URL for the sqlite metadata backend
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://file-vault.db")]
    database_url: String,

    /// Metadata table name
    #[arg(long, env = "METADATA_TABLE", default_value = "FileMetadata")]
    metadata_table: String,

    /// Upper bound on a single metadata index call, in milliseconds
    #[arg(long, env = "METADATA_TIMEOUT_MS", default_value = "2000")]
    metadata_timeout_ms: u64,

    /// Largest accepted upload in bytes
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value = "52428800")]
    max_upload_bytes: u64,

    /// Origin allowed by CORS
    #[arg(long, env = "FRONTEND_URL", default_value = "http://localhost:3000")]
    frontend_url: String,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Cli {
    fn to_app_config(&self) -> Result<AppConfig> {
        let storage_backend = match self.storage_backend.as_str() {
            "memory" => StorageBackend::InMemory,
            "local" => StorageBackend::LocalFileSystem {
                root: self.local_root.clone(),
            },
            "s3" => StorageBackend::S3(S3Config {
                region: self.s3_region.clone(),
                access_key: self.s3_access_key.clone(),
                secret_key: self.s3_secret_key.clone(),
                endpoint: self.s3_endpoint.clone(),
                allow_http: self.s3_allow_http,
            }),
            _ => anyhow::bail!("Unknown storage backend: {}", self.storage_backend),
        };

        let metadata_backend = match self.metadata_backend.as_str() {
            "memory" => MetadataBackend::InMemory,
            "sqlite" => MetadataBackend::Sqlite {
                url: self.database_url.clone(),
            },
            _ => anyhow::bail!("Unknown metadata backend: {}", self.metadata_backend),
        };

        let frontend_origin = HeaderValue::from_str(&self.frontend_url)
            .with_context(|| format!("Invalid FRONTEND_URL: {}", self.frontend_url))?;

        Ok(AppConfig {
            storage_backend,
            object_store: ObjectStoreConfig {
                bucket: self.s3_bucket.clone(),
                history_root: self.history_root.clone(),
                head_root: self.head_root.clone(),
                public_base_url: self.public_base_url.clone(),
                signing_secret: self
                    .signing_secret
                    .clone()
                    .map(String::into_bytes)
                    .unwrap_or_default(),
                download_expiry: Duration::from_secs(self.link_expiry_seconds),
                request_timeout: Duration::from_secs(self.storage_timeout_seconds),
                content_type_attributes: true,
            },
            metadata: MetadataIndexConfig {
                backend: metadata_backend,
                table_name: self.metadata_table.clone(),
                ..Default::default()
            },
            file_service: FileServiceConfig {
                max_upload_bytes: self.max_upload_bytes,
                metadata_timeout: Duration::from_millis(self.metadata_timeout_ms),
            },
            http: HttpConfig {
                max_upload_bytes: self.max_upload_bytes,
                frontend_origin,
            },
        })
    }

    fn init_logging(&self) -> Result<()> {
        let env_filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(self.log_level.to_lowercase()))
            .context("Invalid log level")?;

        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .context("Failed to initialize logging")?;

        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    cli.init_logging()?;

    info!("Starting file vault server");
    info!("Storage backend: {}", cli.storage_backend);
    info!("Metadata backend: {}", cli.metadata_backend);

    let config = cli.to_app_config()?;

    let app_services = AppBuilder::new()
        .with_config(config)
        .build()
        .await
        .context("Failed to build application")?;

    let router = app_services.router();

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port)
        .parse()
        .context("Invalid listen address")?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server listening on http://{}", addr);
    info!("Health: http://{}/health", addr);
    info!("CORS origin: {}", cli.frontend_url);

    axum::serve(listener, router)
        .await
        .context("Failed to start server")?;

    Ok(())
}
