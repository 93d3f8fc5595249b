use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde_json::json;
use tracing::{debug, error};

use crate::{
    adapters::inbound::http::dto::ErrorResponseDto,
    domain::errors::{StorageError, ValidationError},
};

/// Error returned by every handler, rendered as an `ErrorResponseDto`
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: &'static str,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, error: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            error,
            message: message.into(),
            details: None,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "ValidationError", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NotFound", message)
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        let status = match &err {
            StorageError::Validation(_) => StatusCode::BAD_REQUEST,
            StorageError::ObjectNotFound { .. } | StorageError::VersionNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            StorageError::InvalidDownloadLink { .. } => StatusCode::FORBIDDEN,
            StorageError::QuotaExceeded { .. } => StatusCode::INSUFFICIENT_STORAGE,
            StorageError::StoreUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            StorageError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let details = match &err {
            StorageError::ObjectNotFound { key } => Some(json!({ "key": key.as_str() })),
            StorageError::VersionNotFound { key, version_id } => Some(json!({
                "key": key.as_str(),
                "versionId": version_id.as_str(),
            })),
            _ => None,
        };

        Self {
            status,
            error: err.kind(),
            message: err.to_string(),
            details,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        StorageError::from(err).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, error = self.error, message = %self.message, "Request failed");
        } else {
            debug!(status = %self.status, error = self.error, message = %self.message, "Request rejected");
        }

        let body = ErrorResponseDto {
            error: self.error.to_string(),
            message: self.message,
            status_code: self.status.as_u16(),
            details: self.details,
            timestamp: Utc::now(),
        };

        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                StorageError::from(ValidationError::MissingParameter("fileName")),
                StatusCode::BAD_REQUEST,
            ),
            (
                StorageError::InvalidDownloadLink {
                    reason: "expired".to_string(),
                },
                StatusCode::FORBIDDEN,
            ),
            (
                StorageError::QuotaExceeded {
                    message: "full".to_string(),
                },
                StatusCode::INSUFFICIENT_STORAGE,
            ),
            (
                StorageError::StoreUnavailable {
                    message: "timeout".to_string(),
                },
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status, status);
        }
    }
}
