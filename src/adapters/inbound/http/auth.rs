use axum::extract::FromRequestParts;
use http::request::Parts;

use crate::{adapters::inbound::http::error::ApiError, domain::value_objects::OwnerId};

/// Header carrying the subject verified by the upstream authentication layer
pub const USER_ID_HEADER: &str = "x-user-id";

/// The owner every `/api/files` request acts on behalf of
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub OwnerId);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| ApiError::unauthorized("Invalid or missing authentication token"))?
            .to_str()
            .map_err(|_| ApiError::unauthorized("Malformed user identity"))?;

        OwnerId::new(raw.to_string())
            .map(AuthenticatedUser)
            .map_err(|e| ApiError::unauthorized(format!("Invalid user identity: {}", e)))
    }
}
