use bytes::Bytes;

use crate::domain::value_objects::{FileName, OwnerId, VersionId};

/// Time-limited capability to fetch one object (optionally one version)
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadAuthorization {
    pub url: String,
    pub expires_in_seconds: u64,
}

/// The parameters carried by a signed download link, as presented back to the gateway
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadLink {
    pub owner: OwnerId,
    pub name: FileName,
    pub version_id: Option<VersionId>,
    /// Unix timestamp (seconds) after which the link is rejected
    pub expires: i64,
    pub disposition: String,
    pub signature: String,
}

/// Bytes served for a verified link
#[derive(Debug, Clone)]
pub struct DownloadedObject {
    pub data: Bytes,
    pub disposition: String,
    pub content_type: Option<String>,
    pub version_id: Option<VersionId>,
}
