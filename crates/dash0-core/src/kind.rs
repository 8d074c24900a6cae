//! Asset kinds and kind-name normalization
//!
//! Documents name their kind in several spellings (`Dashboard`,
//! `Dash0Dashboard`, `check-rule`, `Dash0CheckRule`, ...). Every spelling is
//! folded by [`normalize_kind`] and mapped onto one [`AssetKind`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Product prefix stripped from kind names during normalization
const PRODUCT_PREFIX: &str = "dash0";

/// The kinds of documents the CLI can apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AssetKind {
    Dashboard,
    CheckRule,
    View,
    SyntheticCheck,
    /// Foreign CRD that expands into check rules; never sent to the API itself
    PrometheusRule,
}

/// How an asset obtains its upsert identity when it is created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityPolicy {
    /// The client must send an identity on every write; one is minted when absent
    ClientMinted,
    /// The server assigns an identity when the write carries none
    ServerAssigned,
}

impl AssetKind {
    /// All kinds accepted in input documents
    pub const ALL: [AssetKind; 5] = [
        AssetKind::Dashboard,
        AssetKind::CheckRule,
        AssetKind::View,
        AssetKind::SyntheticCheck,
        AssetKind::PrometheusRule,
    ];

    /// Canonical kind name
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Dashboard => "Dashboard",
            AssetKind::CheckRule => "CheckRule",
            AssetKind::View => "View",
            AssetKind::SyntheticCheck => "SyntheticCheck",
            AssetKind::PrometheusRule => "PrometheusRule",
        }
    }

    /// Lowercase human-readable name used in messages
    pub fn display_name(&self) -> &'static str {
        match self {
            AssetKind::Dashboard => "dashboard",
            AssetKind::CheckRule => "check rule",
            AssetKind::View => "view",
            AssetKind::SyntheticCheck => "synthetic check",
            AssetKind::PrometheusRule => "prometheus rule",
        }
    }

    /// Whether assets of this kind are stored by the API as-is
    pub fn is_native(&self) -> bool {
        !matches!(self, AssetKind::PrometheusRule)
    }

    /// Identity policy for native kinds
    pub fn identity_policy(&self) -> IdentityPolicy {
        match self {
            AssetKind::CheckRule | AssetKind::PrometheusRule => IdentityPolicy::ServerAssigned,
            AssetKind::Dashboard | AssetKind::View | AssetKind::SyntheticCheck => {
                IdentityPolicy::ClientMinted
            }
        }
    }

    /// Resolve any accepted spelling of a kind name
    pub fn from_name(name: &str) -> Option<Self> {
        match normalize_kind(name).as_str() {
            "dashboard" => Some(AssetKind::Dashboard),
            "checkrule" => Some(AssetKind::CheckRule),
            "view" => Some(AssetKind::View),
            "syntheticcheck" => Some(AssetKind::SyntheticCheck),
            "prometheusrule" => Some(AssetKind::PrometheusRule),
            _ => None,
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| CoreError::UnsupportedKind {
            kind: s.to_string(),
        })
    }
}

/// Fold a kind name: lowercase, drop `-`/`_`, strip the product prefix
pub fn normalize_kind(name: &str) -> String {
    let folded: String = name
        .trim()
        .chars()
        .filter(|c| *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect();

    match folded.strip_prefix(PRODUCT_PREFIX) {
        Some(rest) if !rest.is_empty() => rest.to_string(),
        _ => folded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_kind() {
        assert_eq!(normalize_kind("Dash0Dashboard"), "dashboard");
        assert_eq!(normalize_kind("check-rule"), "checkrule");
        assert_eq!(normalize_kind("Synthetic_Check"), "syntheticcheck");
        assert_eq!(normalize_kind("  View "), "view");
        assert_eq!(normalize_kind("dash0"), "dash0");
    }

    #[test]
    fn test_from_name_aliases() {
        assert_eq!(AssetKind::from_name("Dashboard"), Some(AssetKind::Dashboard));
        assert_eq!(AssetKind::from_name("Dash0Dashboard"), Some(AssetKind::Dashboard));
        assert_eq!(AssetKind::from_name("CheckRule"), Some(AssetKind::CheckRule));
        assert_eq!(AssetKind::from_name("Dash0CheckRule"), Some(AssetKind::CheckRule));
        assert_eq!(AssetKind::from_name("check-rule"), Some(AssetKind::CheckRule));
        assert_eq!(AssetKind::from_name("PrometheusRule"), Some(AssetKind::PrometheusRule));
        assert_eq!(AssetKind::from_name("synthetic-check"), Some(AssetKind::SyntheticCheck));
        assert_eq!(AssetKind::from_name("Dash0View"), Some(AssetKind::View));
        assert_eq!(AssetKind::from_name("Deployment"), None);
        assert_eq!(AssetKind::from_name(""), None);
    }

    #[test]
    fn test_from_str_error() {
        let err = "ConfigMap".parse::<AssetKind>().unwrap_err();
        assert_eq!(err.to_string(), "unsupported asset kind: ConfigMap");
    }

    #[test]
    fn test_identity_policy() {
        assert_eq!(AssetKind::Dashboard.identity_policy(), IdentityPolicy::ClientMinted);
        assert_eq!(AssetKind::View.identity_policy(), IdentityPolicy::ClientMinted);
        assert_eq!(
            AssetKind::SyntheticCheck.identity_policy(),
            IdentityPolicy::ClientMinted
        );
        assert_eq!(AssetKind::CheckRule.identity_policy(), IdentityPolicy::ServerAssigned);
    }

    #[test]
    fn test_is_native() {
        assert!(AssetKind::Dashboard.is_native());
        assert!(!AssetKind::PrometheusRule.is_native());
    }
}
