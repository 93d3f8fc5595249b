use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    adapters::inbound::http::{
        auth::AuthenticatedUser,
        dto::{ListVersionsResponseDto, RestoreResponseDto, VersionDto},
        error::ApiError,
        router::AppState,
    },
    domain::models::{FileRequest, RestoreRequest},
};

/// Handle `GET /api/files/versions/{file_name}`
pub async fn list_versions(
    State(state): State<AppState>,
    AuthenticatedUser(owner): AuthenticatedUser,
    Path(file_name): Path<String>,
) -> Result<Json<ListVersionsResponseDto>, ApiError> {
    let versions: Vec<VersionDto> = state
        .file_service
        .list_versions(FileRequest {
            owner,
            name: Some(file_name.clone()),
        })
        .await?
        .into_iter()
        .map(VersionDto::from)
        .collect();

    Ok(Json(ListVersionsResponseDto {
        message: "Versions retrieved successfully".to_string(),
        file_name,
        count: versions.len(),
        versions,
    }))
}

/// Handle `POST /api/files/restore/{file_name}/{version_id}`
pub async fn restore_version(
    State(state): State<AppState>,
    AuthenticatedUser(owner): AuthenticatedUser,
    Path((file_name, version_id)): Path<(String, String)>,
) -> Result<Json<RestoreResponseDto>, ApiError> {
    let receipt = state
        .file_service
        .restore(RestoreRequest {
            owner,
            name: Some(file_name.clone()),
            version_id: Some(version_id),
        })
        .await?;

    Ok(Json(RestoreResponseDto {
        message: "Version restored successfully".to_string(),
        file_name,
        new_version_id: receipt.new_version_id.as_str().to_string(),
        restored_from_version_id: receipt.restored_from_version_id.as_str().to_string(),
    }))
}
