use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::domain::value_objects::{FileName, ObjectKey, OwnerId, VersionId};

/// MIME type recorded when the uploader did not declare one
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// A file received from the routing layer, not yet validated
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub data: Bytes,
    pub mime_type: Option<String>,
}

/// Request to store a new version of a file
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub owner: OwnerId,
    pub file: Option<UploadedFile>,
}

/// Request naming one file; `name` is validated by the service
#[derive(Debug, Clone)]
pub struct FileRequest {
    pub owner: OwnerId,
    pub name: Option<String>,
}

/// Request for a download link, optionally pinned to one version
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub owner: OwnerId,
    pub name: Option<String>,
    pub version_id: Option<String>,
}

/// Request to make an older version current again
#[derive(Debug, Clone)]
pub struct RestoreRequest {
    pub owner: OwnerId,
    pub name: Option<String>,
    pub version_id: Option<String>,
}

/// Result of a successful object store write
#[derive(Debug, Clone, PartialEq)]
pub struct PutOutcome {
    pub version_id: VersionId,
    pub stored_key: ObjectKey,
    pub size_bytes: u64,
}

/// The current version of one file, as seen by a namespace listing
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentObject {
    pub name: String,
    pub size_bytes: u64,
    pub last_modified: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadReceipt {
    pub name: FileName,
    pub size: u64,
    pub mime_type: String,
    pub version_id: VersionId,
    pub key: ObjectKey,
}

/// One row of a listing, optionally enriched from the metadata index
#[derive(Debug, Clone, PartialEq)]
pub struct FileListing {
    pub name: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
    pub mime_type: Option<String>,
    pub current_version_id: Option<VersionId>,
    pub uploaded_at: Option<DateTime<Utc>>,
}

impl From<CurrentObject> for FileListing {
    fn from(object: CurrentObject) -> Self {
        FileListing {
            name: object.name,
            size: object.size_bytes,
            last_modified: object.last_modified,
            mime_type: None,
            current_version_id: None,
            uploaded_at: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteReceipt {
    pub deleted: bool,
    pub key: ObjectKey,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RestoreReceipt {
    pub new_version_id: VersionId,
    pub restored_from_version_id: VersionId,
}
