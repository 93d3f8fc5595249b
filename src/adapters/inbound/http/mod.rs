pub mod auth;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;

pub use auth::{AuthenticatedUser, USER_ID_HEADER};
pub use dto::*;
pub use error::ApiError;
pub use router::*;
