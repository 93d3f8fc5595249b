use crate::domain::models::{LabeledVersion, ObjectVersion};

/// Order versions oldest first and label them `V1..Vn`.
///
/// The sort is stable, so versions sharing a timestamp keep the order the
/// store listed them in. `is_latest` is taken from the store's own flag.
pub fn reconcile(mut versions: Vec<ObjectVersion>) -> Vec<LabeledVersion> {
    versions.sort_by_key(|version| version.created_at);

    versions
        .into_iter()
        .enumerate()
        .map(|(index, version)| LabeledVersion {
            label: format!("V{}", index + 1),
            version_id: version.version_id,
            last_modified: version.created_at,
            size: version.size_bytes,
            is_latest: version.is_current,
        })
        .collect()
}
