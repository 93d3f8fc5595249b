use axum::{
    Json,
    extract::{Multipart, Path, Query, State, multipart::MultipartError},
    http::StatusCode,
};

use crate::{
    adapters::inbound::http::{
        auth::AuthenticatedUser,
        dto::{
            DeleteResponseDto, DownloadQueryDto, DownloadResponseDto, FileDto,
            ListFilesResponseDto, UploadResponseDto,
        },
        error::ApiError,
        router::AppState,
    },
    domain::{
        errors::ValidationError,
        models::{DownloadRequest, FileRequest, UploadRequest, UploadedFile},
    },
};

/// Multipart field holding the uploaded file
const FILE_FIELD: &str = "file";

/// A body cut off by the request limit reads as an oversized upload
fn multipart_error(err: MultipartError, max_upload_bytes: u64) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ValidationError::PayloadTooLarge {
            size: max_upload_bytes + 1,
            limit_mb: max_upload_bytes / (1024 * 1024),
        }
        .into()
    } else {
        ApiError::bad_request(err.body_text())
    }
}

/// Handle `POST /api/files/upload`
pub async fn upload_file(
    State(state): State<AppState>,
    AuthenticatedUser(owner): AuthenticatedUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponseDto>), ApiError> {
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, state.max_upload_bytes))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let name = field.file_name().unwrap_or_default().to_string();
        let mime_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, state.max_upload_bytes))?;

        file = Some(UploadedFile {
            name,
            data,
            mime_type,
        });
    }

    let receipt = state
        .file_service
        .upload(UploadRequest { owner, file })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(UploadResponseDto {
            message: "File uploaded successfully".to_string(),
            file: receipt.into(),
        }),
    ))
}

/// Handle `GET /api/files/list`
pub async fn list_files(
    State(state): State<AppState>,
    AuthenticatedUser(owner): AuthenticatedUser,
) -> Result<Json<ListFilesResponseDto>, ApiError> {
    let files: Vec<FileDto> = state
        .file_service
        .list(&owner)
        .await?
        .into_iter()
        .map(FileDto::from)
        .collect();

    Ok(Json(ListFilesResponseDto {
        message: "Files retrieved successfully".to_string(),
        count: files.len(),
        files,
    }))
}

/// Handle `GET /api/files/download/{file_name}`
pub async fn download_file(
    State(state): State<AppState>,
    AuthenticatedUser(owner): AuthenticatedUser,
    Path(file_name): Path<String>,
    Query(query): Query<DownloadQueryDto>,
) -> Result<Json<DownloadResponseDto>, ApiError> {
    let version_id = query.version_id.filter(|v| !v.is_empty());

    let authorization = state
        .file_service
        .download(DownloadRequest {
            owner,
            name: Some(file_name.clone()),
            version_id: version_id.clone(),
        })
        .await?;

    Ok(Json(DownloadResponseDto {
        message: "Download URL generated".to_string(),
        url: authorization.url,
        expires_in_seconds: authorization.expires_in_seconds,
        file_name,
        version_id: version_id.unwrap_or_else(|| "latest".to_string()),
    }))
}

/// Handle `DELETE /api/files/delete/{file_name}`
pub async fn delete_file(
    State(state): State<AppState>,
    AuthenticatedUser(owner): AuthenticatedUser,
    Path(file_name): Path<String>,
) -> Result<Json<DeleteResponseDto>, ApiError> {
    let receipt = state
        .file_service
        .delete(FileRequest {
            owner,
            name: Some(file_name.clone()),
        })
        .await?;

    Ok(Json(DeleteResponseDto {
        message: "File deleted successfully".to_string(),
        deleted: receipt.deleted,
        key: receipt.key.as_str().to_string(),
        file_name,
    }))
}
