//! Synthetic checks (scheduled HTTP probes)

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::asset::{NativeAsset, Permission};
use crate::id::AssetId;
use crate::kind::AssetKind;
use crate::labels::LabeledMetadata;

/// Kind value the synthetic check API expects on the wire
pub const SYNTHETIC_CHECK_WIRE_KIND: &str = "Dash0SyntheticCheck";

fn default_kind() -> String {
    SYNTHETIC_CHECK_WIRE_KIND.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyntheticCheck {
    #[serde(default = "default_kind")]
    pub kind: String,

    #[serde(default)]
    pub metadata: LabeledMetadata,

    #[serde(default)]
    pub spec: SyntheticCheckSpec,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyntheticCheckSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Schedule>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin: Option<SyntheticPlugin>,

    // Server-managed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<Permission>>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// When and where the probe runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Probe implementation (`http` plus its request/assertion spec)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyntheticPlugin {
    #[serde(default)]
    pub kind: String,

    #[serde(default)]
    pub spec: Value,
}

impl SyntheticPlugin {
    /// Target URL of an HTTP probe
    pub fn url(&self) -> Option<&str> {
        self.spec
            .get("request")
            .and_then(|r| r.get("url"))
            .and_then(Value::as_str)
    }
}

impl NativeAsset for SyntheticCheck {
    const KIND: AssetKind = AssetKind::SyntheticCheck;

    fn name(&self) -> &str {
        self.spec
            .display
            .as_ref()
            .and_then(|d| d.get("name"))
            .and_then(Value::as_str)
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.metadata.name)
    }

    fn asset_id(&self) -> Option<AssetId> {
        self.metadata.asset_id()
    }

    fn with_asset_id(mut self, id: Option<AssetId>) -> Self {
        self.metadata.set_asset_id(id);
        self
    }
}
