/// Validation errors for request parameters and domain value objects
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} parameter is required")]
    MissingParameter(&'static str),

    #[error("No file provided in request")]
    MissingFile,

    #[error("File size exceeds the {limit_mb} MB limit")]
    PayloadTooLarge { size: u64, limit_mb: u64 },

    // OwnerId
    #[error("Owner id cannot be empty")]
    EmptyOwnerId,

    #[error("Owner id too long: {actual} bytes (max: {max})")]
    OwnerIdTooLong { actual: usize, max: usize },

    #[error("Invalid character in owner id: {0:?}")]
    InvalidOwnerIdCharacter(char),

    #[error("Owner id cannot start with '.'")]
    ReservedOwnerId,

    // FileName
    #[error("File name cannot be empty")]
    EmptyFileName,

    #[error("File name too long: {actual} bytes (max: {max})")]
    FileNameTooLong { actual: usize, max: usize },

    #[error("Invalid character in file name: {0:?}")]
    InvalidFileNameCharacter(char),

    #[error("File name cannot be '.' or '..'")]
    RelativeFileName,

    // VersionId
    #[error("Version ID cannot be empty")]
    EmptyVersionId,

    #[error("Version ID too long: {actual} characters (max: {max})")]
    VersionIdTooLong { actual: usize, max: usize },

    #[error("Invalid character in version ID: {0:?}")]
    InvalidVersionIdCharacter(char),

    #[error("Invalid value for field '{field}': '{value}' (expected: {expected})")]
    InvalidField {
        field: String,
        value: String,
        expected: String,
    },
}
