//! The native asset union

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::check_rule::CheckRule;
use crate::dashboard::Dashboard;
use crate::error::{CoreError, Result};
use crate::id::AssetId;
use crate::kind::AssetKind;
use crate::synthetic_check::SyntheticCheck;
use crate::view::View;

/// Computed access grant attached to an asset by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Permission {
    #[serde(default)]
    pub actions: Vec<String>,

    /// Subject of the grant (`role`, `userId`, `teamId`, ...)
    #[serde(flatten)]
    pub subject: BTreeMap<String, Value>,
}

/// Behaviour shared by every native asset type
pub trait NativeAsset: Serialize + DeserializeOwned + Clone + Into<Asset> {
    const KIND: AssetKind;

    /// Human-facing name
    fn name(&self) -> &str;

    /// Upsert identity, wherever this kind keeps it
    fn asset_id(&self) -> Option<AssetId>;

    /// Return the asset with its identity replaced
    fn with_asset_id(self, id: Option<AssetId>) -> Self;
}

/// A native asset of any kind
#[derive(Debug, Clone, PartialEq)]
pub enum Asset {
    Dashboard(Dashboard),
    CheckRule(CheckRule),
    View(View),
    SyntheticCheck(SyntheticCheck),
}

impl Asset {
    pub fn kind(&self) -> AssetKind {
        match self {
            Asset::Dashboard(_) => AssetKind::Dashboard,
            Asset::CheckRule(_) => AssetKind::CheckRule,
            Asset::View(_) => AssetKind::View,
            Asset::SyntheticCheck(_) => AssetKind::SyntheticCheck,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Asset::Dashboard(a) => a.name(),
            Asset::CheckRule(a) => a.name(),
            Asset::View(a) => a.name(),
            Asset::SyntheticCheck(a) => a.name(),
        }
    }

    pub fn asset_id(&self) -> Option<AssetId> {
        match self {
            Asset::Dashboard(a) => a.asset_id(),
            Asset::CheckRule(a) => a.asset_id(),
            Asset::View(a) => a.asset_id(),
            Asset::SyntheticCheck(a) => a.asset_id(),
        }
    }

    pub fn with_asset_id(self, id: Option<AssetId>) -> Self {
        match self {
            Asset::Dashboard(a) => a.with_asset_id(id).into(),
            Asset::CheckRule(a) => a.with_asset_id(id).into(),
            Asset::View(a) => a.with_asset_id(id).into(),
            Asset::SyntheticCheck(a) => a.with_asset_id(id).into(),
        }
    }

    /// Wire representation sent to the API
    pub fn to_json(&self) -> Result<Value> {
        let value = match self {
            Asset::Dashboard(a) => serde_json::to_value(a)?,
            Asset::CheckRule(a) => serde_json::to_value(a)?,
            Asset::View(a) => serde_json::to_value(a)?,
            Asset::SyntheticCheck(a) => serde_json::to_value(a)?,
        };
        Ok(value)
    }

    /// Decode an API response body for a native kind
    pub fn from_json(kind: AssetKind, value: Value) -> Result<Self> {
        let asset = match kind {
            AssetKind::Dashboard => Asset::Dashboard(serde_json::from_value(value)?),
            AssetKind::CheckRule => Asset::CheckRule(serde_json::from_value(value)?),
            AssetKind::View => Asset::View(serde_json::from_value(value)?),
            AssetKind::SyntheticCheck => Asset::SyntheticCheck(serde_json::from_value(value)?),
            AssetKind::PrometheusRule => return Err(CoreError::NotNative { kind }),
        };
        Ok(asset)
    }

    /// Exported form: the wire representation plus a `kind` field, so the
    /// document can be fed back into `apply`
    pub fn to_document(&self) -> Result<Value> {
        let mut value = self.to_json()?;
        if let Value::Object(map) = &mut value {
            map.entry("kind")
                .or_insert_with(|| Value::String(self.kind().as_str().to_string()));
        }
        Ok(value)
    }
}

impl From<Dashboard> for Asset {
    fn from(a: Dashboard) -> Self {
        Asset::Dashboard(a)
    }
}

impl From<CheckRule> for Asset {
    fn from(a: CheckRule) -> Self {
        Asset::CheckRule(a)
    }
}

impl From<View> for Asset {
    fn from(a: View) -> Self {
        Asset::View(a)
    }
}

impl From<SyntheticCheck> for Asset {
    fn from(a: SyntheticCheck) -> Self {
        Asset::SyntheticCheck(a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_rule(yaml: &str) -> Asset {
        Asset::CheckRule(serde_yaml::from_str(yaml).unwrap())
    }

    #[test]
    fn test_asset_dispatch() {
        let asset = check_rule("id: r-1\nname: HighErrors\nexpression: up == 0\n");
        assert_eq!(asset.kind(), AssetKind::CheckRule);
        assert_eq!(asset.name(), "HighErrors");
        assert_eq!(asset.asset_id().unwrap().as_str(), "r-1");

        let cleared = asset.with_asset_id(None);
        assert!(cleared.asset_id().is_none());
    }

    #[test]
    fn test_to_document_adds_kind() {
        let asset = check_rule("name: r1\nexpression: up == 0\n");
        let doc = asset.to_document().unwrap();
        assert_eq!(doc["kind"], "CheckRule");
        assert_eq!(doc["name"], "r1");

        // the wire form carries no kind for check rules
        assert!(asset.to_json().unwrap().get("kind").is_none());
    }

    #[test]
    fn test_from_json_rejects_foreign_kind() {
        let err = Asset::from_json(AssetKind::PrometheusRule, serde_json::json!({})).unwrap_err();
        assert!(matches!(err, CoreError::NotNative { .. }));
    }

    #[test]
    fn test_from_json_round_trip() {
        let asset = check_rule("id: r-1\nname: r1\nexpression: up == 0\n");
        let json = asset.to_json().unwrap();
        let back = Asset::from_json(AssetKind::CheckRule, json).unwrap();
        assert_eq!(back, asset);
    }
}
