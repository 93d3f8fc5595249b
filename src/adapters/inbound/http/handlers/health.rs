use axum::{Json, extract::State};
use chrono::Utc;

use crate::adapters::inbound::http::{dto::HealthResponseDto, error::ApiError, router::AppState};

/// Handle `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponseDto> {
    Json(HealthResponseDto {
        status: "OK".to_string(),
        timestamp: Utc::now(),
        uptime_seconds: state.started_at.elapsed().as_secs_f64(),
    })
}

/// Fallback for unknown routes
pub async fn route_not_found() -> ApiError {
    ApiError::not_found("Route not found")
}
