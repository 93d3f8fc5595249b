use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::IntoResponse,
};

use crate::{
    adapters::inbound::http::{dto::SignedLinkQueryDto, error::ApiError, router::AppState},
    domain::{
        errors::StorageError,
        models::{DEFAULT_MIME_TYPE, DownloadLink},
        value_objects::{FileName, OwnerId, VersionId},
    },
};

fn malformed(reason: impl std::fmt::Display) -> StorageError {
    StorageError::InvalidDownloadLink {
        reason: format!("malformed link: {}", reason),
    }
}

/// Handle `GET /downloads/{owner_id}/{file_name}`.
///
/// No user identity is required; the signed query is the capability.
pub async fn serve_download(
    State(state): State<AppState>,
    Path((owner_id, file_name)): Path<(String, String)>,
    Query(query): Query<SignedLinkQueryDto>,
) -> Result<impl IntoResponse, ApiError> {
    let link = DownloadLink {
        owner: OwnerId::new(owner_id).map_err(malformed)?,
        name: FileName::new(file_name).map_err(malformed)?,
        version_id: query
            .version_id
            .map(VersionId::new)
            .transpose()
            .map_err(malformed)?,
        expires: query.expires.ok_or_else(|| malformed("missing expires"))?,
        disposition: query
            .disposition
            .ok_or_else(|| malformed("missing disposition"))?,
        signature: query
            .signature
            .ok_or_else(|| malformed("missing signature"))?,
    };

    let object = state.file_service.open_download(link).await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        object
            .content_type
            .as_deref()
            .and_then(|ct| HeaderValue::from_str(ct).ok())
            .unwrap_or(HeaderValue::from_static(DEFAULT_MIME_TYPE)),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_bytes(object.disposition.as_bytes())
            .unwrap_or(HeaderValue::from_static("attachment")),
    );
    if let Some(version_id) = &object.version_id {
        if let Ok(value) = HeaderValue::from_str(version_id.as_str()) {
            headers.insert("x-version-id", value);
        }
    }

    Ok((StatusCode::OK, headers, object.data))
}
