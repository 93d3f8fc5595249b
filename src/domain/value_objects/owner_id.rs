use crate::domain::errors::ValidationError;

/// Opaque identifier of the authenticated user owning a set of files
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnerId(String);

impl OwnerId {
    pub const MAX_LEN: usize = 128;

    pub fn new(value: String) -> Result<Self, ValidationError> {
        if value.is_empty() {
            return Err(ValidationError::EmptyOwnerId);
        }

        if value.len() > Self::MAX_LEN {
            return Err(ValidationError::OwnerIdTooLong {
                actual: value.len(),
                max: Self::MAX_LEN,
            });
        }

        // Leading dots are reserved for the history namespaces inside the bucket
        if value.starts_with('.') {
            return Err(ValidationError::ReservedOwnerId);
        }

        if let Some(c) = value.chars().find(|c| *c == '/' || c.is_control()) {
            return Err(ValidationError::InvalidOwnerIdCharacter(c));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
