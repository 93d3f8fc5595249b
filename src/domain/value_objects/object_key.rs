use crate::domain::value_objects::{FileName, OwnerId};

/// Key of a file object in the bucket: `{owner}/{name}`.
///
/// Keys can only be built from a validated owner and name, so two owners can
/// never produce the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey(String);

impl ObjectKey {
    pub fn for_file(owner: &OwnerId, name: &FileName) -> Self {
        Self(format!("{}/{}", owner.as_str(), name.as_str()))
    }

    /// Prefix shared by every key belonging to `owner`
    pub fn owner_prefix(owner: &OwnerId) -> String {
        format!("{}/", owner.as_str())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the file name part of the key (everything after the owner)
    pub fn file_name(&self) -> &str {
        self.0.split_once('/').map_or(&self.0, |(_, name)| name)
    }
}

impl std::fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_owner_scoped() {
        let name = FileName::new("report.pdf".to_string()).unwrap();
        let alice = OwnerId::new("alice".to_string()).unwrap();
        let bob = OwnerId::new("bob".to_string()).unwrap();

        let key = ObjectKey::for_file(&alice, &name);
        assert_eq!(key.as_str(), "alice/report.pdf");
        assert_eq!(key.file_name(), "report.pdf");
        assert_ne!(key, ObjectKey::for_file(&bob, &name));
        assert!(key.as_str().starts_with(&ObjectKey::owner_prefix(&alice)));
    }
}
