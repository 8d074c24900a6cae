//! Saved views (filtered log/span/metric tables)

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::asset::{NativeAsset, Permission};
use crate::id::AssetId;
use crate::kind::AssetKind;
use crate::labels::LabeledMetadata;

/// Kind value the view API expects on the wire
pub const VIEW_WIRE_KIND: &str = "Dash0View";

fn default_kind() -> String {
    VIEW_WIRE_KIND.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct View {
    #[serde(default = "default_kind")]
    pub kind: String,

    #[serde(default)]
    pub metadata: LabeledMetadata,

    #[serde(default)]
    pub spec: ViewSpec,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<ViewDisplay>,

    /// Signal the view targets (`logs`, `spans`, `metrics`, ...)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub view_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<Value>,

    // Server-managed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<Permission>>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewDisplay {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl NativeAsset for View {
    const KIND: AssetKind = AssetKind::View;

    fn name(&self) -> &str {
        match &self.spec.display {
            Some(display) if !display.name.is_empty() => &display.name,
            _ => &self.metadata.name,
        }
    }

    fn asset_id(&self) -> Option<AssetId> {
        self.metadata.asset_id()
    }

    fn with_asset_id(mut self, id: Option<AssetId>) -> Self {
        self.metadata.set_asset_id(id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_view() {
        let yaml = r#"
kind: Dash0View
metadata:
  name: checkout-errors
  labels:
    dash0.com/id: view-42
spec:
  display:
    name: Checkout errors
  type: logs
  filter:
    - key: service.name
      operator: is
      value: checkout
"#;
        let view: View = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(view.name(), "Checkout errors");
        assert_eq!(view.asset_id().unwrap().as_str(), "view-42");
        assert_eq!(view.spec.view_type.as_deref(), Some("logs"));
        assert!(view.spec.filter.as_ref().unwrap().is_array());
    }

    #[test]
    fn test_default_kind_and_name_fallback() {
        let view: View = serde_yaml::from_str("metadata:\n  name: plain\n").unwrap();
        assert_eq!(view.kind, VIEW_WIRE_KIND);
        assert_eq!(view.name(), "plain");
        assert!(view.asset_id().is_none());
    }
}
