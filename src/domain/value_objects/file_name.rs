use crate::domain::errors::ValidationError;

/// Name of a file inside one owner's namespace.
///
/// Names are flat: a `/` would escape into a nested key and break the
/// one-name-per-key mapping, so it is rejected along with control characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileName(String);

impl FileName {
    /// Single path segment limit of common filesystems; keeps the longest
    /// history key (`.versions/{owner}/{name}/{versionId}`) under S3's 1024 bytes
    pub const MAX_LEN: usize = 255;

    pub fn new(value: String) -> Result<Self, ValidationError> {
        if value.is_empty() {
            return Err(ValidationError::EmptyFileName);
        }

        if value.len() > Self::MAX_LEN {
            return Err(ValidationError::FileNameTooLong {
                actual: value.len(),
                max: Self::MAX_LEN,
            });
        }

        if value == "." || value == ".." {
            return Err(ValidationError::RelativeFileName);
        }

        if let Some(c) = value.chars().find(|c| *c == '/' || c.is_control()) {
            return Err(ValidationError::InvalidFileNameCharacter(c));
        }

        Ok(Self(value))
    }

    /// Parse a request parameter that must be present
    pub fn required(value: Option<String>) -> Result<Self, ValidationError> {
        match value {
            Some(v) if !v.is_empty() => Self::new(v),
            _ => Err(ValidationError::MissingParameter("fileName")),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FileName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_file_names() {
        assert!(FileName::new("report.pdf".to_string()).is_ok());
        assert!(FileName::new("quarterly report (final).xlsx".to_string()).is_ok());
        assert!(FileName::new(".bashrc".to_string()).is_ok());
    }

    #[test]
    fn test_invalid_file_names() {
        assert!(FileName::new(String::new()).is_err());
        assert!(FileName::new("..".to_string()).is_err());
        assert!(FileName::new("dir/file.txt".to_string()).is_err());
        assert!(FileName::new("tab\tname".to_string()).is_err());
        assert!(FileName::new("x".repeat(256)).is_err());
    }

    #[test]
    fn test_length_limit_is_in_bytes() {
        assert!(FileName::new("x".repeat(FileName::MAX_LEN)).is_ok());
        assert_eq!(
            FileName::new("é".repeat(128)),
            Err(ValidationError::FileNameTooLong {
                actual: 256,
                max: 255
            })
        );
    }

    #[test]
    fn test_required_parameter() {
        assert_eq!(
            FileName::required(None),
            Err(ValidationError::MissingParameter("fileName"))
        );
        assert_eq!(
            FileName::required(Some(String::new())),
            Err(ValidationError::MissingParameter("fileName"))
        );
        assert_eq!(
            FileName::required(Some("a.txt".to_string())).unwrap().as_str(),
            "a.txt"
        );
    }
}
