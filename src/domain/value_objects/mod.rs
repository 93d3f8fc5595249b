mod file_name;
mod object_key;
mod owner_id;
mod version_id;

pub use file_name::FileName;
pub use object_key::ObjectKey;
pub use owner_id::OwnerId;
pub use version_id::VersionId;
