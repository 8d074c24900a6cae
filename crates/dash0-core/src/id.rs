//! Asset identity

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Upsert identity of an asset
///
/// Never empty: an empty or blank identifier in a document decodes as an
/// absent identity, so `Option<AssetId>` is the only way to express "no id".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    /// Wrap an identifier, rejecting empty and blank strings
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            None
        } else {
            Some(Self(id))
        }
    }

    /// Mint a fresh, globally unique identity
    pub fn mint() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AssetId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Deserialize an optional identity, treating empty strings as absent
pub fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<AssetId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(AssetId::new))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "deserialize_optional")]
        id: Option<AssetId>,
    }

    #[test]
    fn test_new_rejects_blank() {
        assert!(AssetId::new("").is_none());
        assert!(AssetId::new("   ").is_none());
        assert_eq!(AssetId::new("abc").unwrap().as_str(), "abc");
    }

    #[test]
    fn test_mint_is_unique() {
        let a = AssetId::mint();
        let b = AssetId::mint();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
    }

    #[test]
    fn test_deserialize_optional() {
        let h: Holder = serde_yaml::from_str("id: abc").unwrap();
        assert_eq!(h.id, AssetId::new("abc"));

        let h: Holder = serde_yaml::from_str("id: ''").unwrap();
        assert!(h.id.is_none());

        let h: Holder = serde_yaml::from_str("id: null").unwrap();
        assert!(h.id.is_none());

        let h: Holder = serde_yaml::from_str("{}").unwrap();
        assert!(h.id.is_none());
    }
}
