pub mod download;
pub mod file;
pub mod metadata;
pub mod version;

pub use download::*;
pub use file::*;
pub use metadata::*;
pub use version::*;
