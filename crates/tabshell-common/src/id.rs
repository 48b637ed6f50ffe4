use serde::{Deserialize, Serialize};
use std::fmt;

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Opaque, caller-supplied tab identity.
///
/// The registry never interprets the contents; the UI mints fresh ids with
/// [`TabId::generate`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(String);

impl TabId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// A fresh `tab-<uuid>` id.
    pub fn generate() -> Self {
        Self(format!("tab-{}", new_id()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TabId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TabId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_id_is_valid_uuid() {
        let id = new_id();
        let parsed = uuid::Uuid::parse_str(&id);
        assert!(parsed.is_ok());
        assert_eq!(parsed.unwrap().get_version_num(), 4);
    }

    #[test]
    fn generated_tab_ids_are_prefixed_and_unique() {
        let a = TabId::generate();
        let b = TabId::generate();
        assert!(a.as_str().starts_with("tab-"));
        assert_ne!(a, b);
    }

    #[test]
    fn tab_id_display_is_raw_string() {
        let id = TabId::from("tab-1");
        assert_eq!(id.to_string(), "tab-1");
    }

    #[test]
    fn tab_id_serializes_as_plain_string() {
        let id = TabId::from("tab-7");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"tab-7\"");
        let back: TabId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn tab_id_hash() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(TabId::from("a"));
        set.insert(TabId::from("a"));
        set.insert(TabId::from("b"));
        assert_eq!(set.len(), 2);
    }
}
