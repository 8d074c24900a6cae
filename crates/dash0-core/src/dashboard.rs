//! Dashboard assets (Perses-style definition with Dash0 extensions)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::asset::{NativeAsset, Permission};
use crate::id::{self, AssetId};
use crate::kind::AssetKind;

/// Kind value the dashboard API expects on the wire
pub const DASHBOARD_WIRE_KIND: &str = "Dashboard";

fn default_kind() -> String {
    DASHBOARD_WIRE_KIND.to_string()
}

/// A dashboard definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    #[serde(default = "default_kind")]
    pub kind: String,

    #[serde(default)]
    pub metadata: DashboardMetadata,

    /// Free-form panel/layout definition
    #[serde(default)]
    pub spec: Value,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetadata {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,

    // Server-managed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dash0_extensions: Option<DashboardExtensions>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Dash0-specific metadata block, home of the dashboard identity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardExtensions {
    #[serde(
        default,
        deserialize_with = "id::deserialize_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<AssetId>,

    // Server-managed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<Permission>>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl DashboardExtensions {
    pub fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.dataset.is_none()
            && self.origin.is_none()
            && self.permissions.is_none()
            && self.extra.is_empty()
    }
}

impl Dashboard {
    /// Display name from `spec.display.name`, if set
    pub fn display_name(&self) -> Option<&str> {
        self.spec
            .get("display")
            .and_then(|d| d.get("name"))
            .and_then(Value::as_str)
            .filter(|n| !n.is_empty())
    }
}

impl NativeAsset for Dashboard {
    const KIND: AssetKind = AssetKind::Dashboard;

    fn name(&self) -> &str {
        self.display_name().unwrap_or(&self.metadata.name)
    }

    fn asset_id(&self) -> Option<AssetId> {
        self.metadata
            .dash0_extensions
            .as_ref()
            .and_then(|ext| ext.id.clone())
    }

    fn with_asset_id(mut self, id: Option<AssetId>) -> Self {
        match id {
            Some(id) => {
                self.metadata
                    .dash0_extensions
                    .get_or_insert_with(DashboardExtensions::default)
                    .id = Some(id);
            }
            None => {
                if let Some(ext) = self.metadata.dash0_extensions.as_mut() {
                    ext.id = None;
                    if ext.is_empty() {
                        self.metadata.dash0_extensions = None;
                    }
                }
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORTED: &str = r#"
kind: Dashboard
metadata:
  name: checkout-overview
  createdAt: "2024-05-01T10:00:00Z"
  updatedAt: "2024-05-02T10:00:00Z"
  version: 7
  dash0Extensions:
    id: 0b0b2f0e-5e51-4bd7-9d33-8d5f7f1ba0a1
    dataset: default
    origin: terraform
    permissions:
      - role: admin
        actions: ["read", "write"]
spec:
  display:
    name: Checkout Overview
  panels: {}
"#;

    #[test]
    fn test_parse_exported_dashboard() {
        let dashboard: Dashboard = serde_yaml::from_str(EXPORTED).unwrap();
        assert_eq!(dashboard.name(), "Checkout Overview");
        assert_eq!(dashboard.metadata.version, Some(7));
        assert!(dashboard.metadata.created_at.is_some());

        let ext = dashboard.metadata.dash0_extensions.as_ref().unwrap();
        assert_eq!(ext.dataset.as_deref(), Some("default"));
        assert_eq!(ext.permissions.as_ref().unwrap()[0].actions.len(), 2);
        assert_eq!(
            dashboard.asset_id().unwrap().as_str(),
            "0b0b2f0e-5e51-4bd7-9d33-8d5f7f1ba0a1"
        );
    }

    #[test]
    fn test_name_falls_back_to_metadata() {
        let dashboard: Dashboard =
            serde_yaml::from_str("kind: Dashboard\nmetadata:\n  name: plain\n").unwrap();
        assert_eq!(dashboard.name(), "plain");
        assert!(dashboard.asset_id().is_none());
    }

    #[test]
    fn test_with_asset_id_creates_and_prunes_extensions() {
        let dashboard: Dashboard =
            serde_yaml::from_str("metadata:\n  name: plain\n").unwrap();
        assert_eq!(dashboard.kind, "Dashboard");

        let with_id = dashboard.with_asset_id(AssetId::new("d-1"));
        assert_eq!(with_id.asset_id().unwrap().as_str(), "d-1");

        let without = with_id.with_asset_id(None);
        assert!(without.metadata.dash0_extensions.is_none());
    }

    #[test]
    fn test_unknown_fields_are_preserved() {
        let yaml = "kind: Dashboard\napiVersion: perses.dev/v1alpha1\nmetadata:\n  name: x\n  custom: 1\n";
        let dashboard: Dashboard = serde_yaml::from_str(yaml).unwrap();
        let json = serde_json::to_value(&dashboard).unwrap();
        assert_eq!(json["apiVersion"], "perses.dev/v1alpha1");
        assert_eq!(json["metadata"]["custom"], 1);
    }
}
