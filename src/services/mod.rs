mod advisory_metadata;
mod file_service_impl;
mod version_reconciler;

pub use advisory_metadata::AdvisoryMetadata;
pub use file_service_impl::{FileServiceBuilder, FileServiceConfig, FileServiceImpl};
pub use version_reconciler::reconcile;
