use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::models::{FileListing, LabeledVersion, UploadReceipt};

/// Query of `GET /api/files/download/{fileName}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadQueryDto {
    pub version_id: Option<String>,
}

/// Query of a signed link presented to `GET /downloads/{ownerId}/{fileName}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedLinkQueryDto {
    pub version_id: Option<String>,
    pub expires: Option<i64>,
    pub disposition: Option<String>,
    pub signature: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFileDto {
    pub name: String,
    pub size: u64,
    pub mime_type: String,
    pub version_id: String,
    pub key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponseDto {
    pub message: String,
    pub file: UploadedFileDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDto {
    pub name: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_version_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListFilesResponseDto {
    pub message: String,
    pub count: usize,
    pub files: Vec<FileDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadResponseDto {
    pub message: String,
    pub url: String,
    pub expires_in_seconds: u64,
    pub file_name: String,
    /// The pinned version, or `"latest"`
    pub version_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponseDto {
    pub message: String,
    pub deleted: bool,
    pub key: String,
    pub file_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionDto {
    pub label: String,
    pub version_id: String,
    pub last_modified: DateTime<Utc>,
    pub size: u64,
    pub is_latest: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListVersionsResponseDto {
    pub message: String,
    pub file_name: String,
    pub count: usize,
    pub versions: Vec<VersionDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreResponseDto {
    pub message: String,
    pub file_name: String,
    pub new_version_id: String,
    pub restored_from_version_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponseDto {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: f64,
}

/// DTO for error responses
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponseDto {
    pub error: String,
    pub message: String,
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    pub timestamp: DateTime<Utc>,
}

// Conversion implementations

impl From<UploadReceipt> for UploadedFileDto {
    fn from(receipt: UploadReceipt) -> Self {
        Self {
            name: receipt.name.as_str().to_string(),
            size: receipt.size,
            mime_type: receipt.mime_type,
            version_id: receipt.version_id.as_str().to_string(),
            key: receipt.key.as_str().to_string(),
        }
    }
}

impl From<FileListing> for FileDto {
    fn from(listing: FileListing) -> Self {
        Self {
            name: listing.name,
            size: listing.size,
            last_modified: listing.last_modified,
            mime_type: listing.mime_type,
            current_version_id: listing
                .current_version_id
                .map(|v| v.as_str().to_string()),
            uploaded_at: listing.uploaded_at,
        }
    }
}

impl From<LabeledVersion> for VersionDto {
    fn from(version: LabeledVersion) -> Self {
        Self {
            label: version.label,
            version_id: version.version_id.as_str().to_string(),
            last_modified: version.last_modified,
            size: version.size,
            is_latest: version.is_latest,
        }
    }
}
