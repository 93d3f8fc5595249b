use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    routing::{delete, get, post},
};
use std::{sync::Arc, time::Instant};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers::{
    delete_file, download_file, health, list_files, list_versions, restore_version,
    route_not_found, serve_download, upload_file,
};
use crate::ports::services::FileService;

/// Room for multipart boundaries and part headers on top of the file itself
const MULTIPART_OVERHEAD: u64 = 1024 * 1024;

/// Settings for the HTTP surface
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub max_upload_bytes: u64,
    /// The single origin allowed to call the API from a browser
    pub frontend_origin: HeaderValue,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: 50 * 1024 * 1024,
            frontend_origin: HeaderValue::from_static("http://localhost:3000"),
        }
    }
}

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub file_service: Arc<dyn FileService>,
    pub max_upload_bytes: u64,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(file_service: Arc<dyn FileService>, config: &HttpConfig) -> Self {
        Self {
            file_service,
            max_upload_bytes: config.max_upload_bytes,
            started_at: Instant::now(),
        }
    }
}

/// Create a router with the per-user file operations, mounted under `/api/files`
pub fn create_file_router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload_file))
        .route("/list", get(list_files))
        .route("/download/{file_name}", get(download_file))
        .route("/delete/{file_name}", delete(delete_file))
        .route("/versions/{file_name}", get(list_versions))
        .route("/restore/{file_name}/{version_id}", post(restore_version))
}

/// Create the main application router with all endpoints
pub fn create_router(state: AppState, config: &HttpConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(config.frontend_origin.clone())
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    let body_limit = usize::try_from(config.max_upload_bytes + MULTIPART_OVERHEAD)
        .unwrap_or(usize::MAX);

    Router::new()
        .route("/health", get(health))
        .nest("/api/files", create_file_router())
        // Signed-link gateway; the link is the capability
        .route("/downloads/{owner_id}/{file_name}", get(serve_download))
        .fallback(route_not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
