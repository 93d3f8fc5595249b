mod metadata_index;

pub use metadata_index::MetadataIndex;
