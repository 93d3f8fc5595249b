pub mod downloads;
pub mod files;
pub mod health;
pub mod versions;

pub use downloads::*;
pub use files::*;
pub use health::*;
pub use versions::*;
