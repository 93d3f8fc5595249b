use crate::domain::{
    errors::StorageError,
    value_objects::{ObjectKey, VersionId},
};

/// Backend error codes that mean the write was refused for capacity reasons
const QUOTA_CODES: &[&str] = &[
    "QuotaExceeded",
    "ServiceQuotaExceeded",
    "XMinioStorageFull",
    "InsufficientStorage",
    "No space left on device",
];

/// Convert an `object_store` failure on `key` (optionally one of its versions)
/// into the domain taxonomy.
///
/// Not-found keeps its identity; everything else the backend reports
/// (network, credentials, throttling) is `StoreUnavailable` unless it is a
/// capacity refusal.
pub(crate) fn map_backend_error(
    err: object_store::Error,
    key: &ObjectKey,
    version_id: Option<&VersionId>,
) -> StorageError {
    match err {
        object_store::Error::NotFound { .. } => match version_id {
            Some(version_id) => StorageError::VersionNotFound {
                key: key.clone(),
                version_id: version_id.clone(),
            },
            None => StorageError::ObjectNotFound { key: key.clone() },
        },
        other if is_quota_error(&other) => StorageError::QuotaExceeded {
            message: other.to_string(),
        },
        other => StorageError::StoreUnavailable {
            message: format!("{} (key: {})", other, key),
        },
    }
}

fn is_quota_error(err: &object_store::Error) -> bool {
    let message = err.to_string();
    QUOTA_CODES.iter().any(|code| message.contains(code))
}
