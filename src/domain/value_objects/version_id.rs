use crate::domain::errors::ValidationError;

/// Identifier of one stored version of a file, assigned by the object store
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VersionId(String);

impl VersionId {
    pub const MAX_LEN: usize = 255;

    /// Create a new VersionId with validation
    pub fn new(value: String) -> Result<Self, ValidationError> {
        if value.is_empty() {
            return Err(ValidationError::EmptyVersionId);
        }

        if value.len() > Self::MAX_LEN {
            return Err(ValidationError::VersionIdTooLong {
                actual: value.len(),
                max: Self::MAX_LEN,
            });
        }

        for c in value.chars() {
            if !c.is_ascii_alphanumeric() && c != '-' && c != '_' && c != '.' {
                return Err(ValidationError::InvalidVersionIdCharacter(c));
            }
        }

        Ok(Self(value))
    }

    /// Parse a request parameter that must be present
    pub fn required(value: Option<String>) -> Result<Self, ValidationError> {
        match value {
            Some(v) if !v.is_empty() => Self::new(v),
            _ => Err(ValidationError::MissingParameter("versionId")),
        }
    }

    /// Generate a new time-ordered version ID.
    ///
    /// UUIDv7 strings sort lexicographically in creation order, so a plain
    /// key listing returns versions oldest first.
    pub fn generate() -> Self {
        Self(uuid::Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VersionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
