//! Check rules (Prometheus-style alerting rules)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::asset::{NativeAsset, Permission};
use crate::id::{self, AssetId};
use crate::kind::AssetKind;

/// An alerting rule as stored by the API
///
/// `alert`/`expr` are accepted as aliases of `name`/`expression`, so a bare
/// Prometheus rule entry decodes as well.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckRule {
    /// Document kind; input only, the API shape has none
    #[serde(default, skip_serializing)]
    pub kind: Option<String>,

    #[serde(
        default,
        deserialize_with = "id::deserialize_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<AssetId>,

    #[serde(default, alias = "alert")]
    pub name: String,

    #[serde(default, alias = "expr")]
    pub expression: String,

    #[serde(rename = "for", default, skip_serializing_if = "Option::is_none")]
    pub for_duration: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_firing_for: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,

    // Server-managed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<Permission>>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl NativeAsset for CheckRule {
    const KIND: AssetKind = AssetKind::CheckRule;

    fn name(&self) -> &str {
        &self.name
    }

    fn asset_id(&self) -> Option<AssetId> {
        self.id.clone()
    }

    fn with_asset_id(mut self, id: Option<AssetId>) -> Self {
        self.id = id;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let rule: CheckRule =
            serde_yaml::from_str("kind: CheckRule\nname: r1\nexpression: up==0\n").unwrap();
        assert_eq!(rule.name, "r1");
        assert_eq!(rule.expression, "up==0");
        assert_eq!(rule.kind.as_deref(), Some("CheckRule"));
        assert!(rule.id.is_none());
        assert!(rule.extra.is_empty());
    }

    #[test]
    fn test_prometheus_aliases() {
        let rule: CheckRule = serde_yaml::from_str(
            "alert: HighLatency\nexpr: histogram_quantile(0.99, rate(x[5m])) > 1\nfor: 5m\n",
        )
        .unwrap();
        assert_eq!(rule.name, "HighLatency");
        assert!(rule.expression.starts_with("histogram_quantile"));
        assert_eq!(rule.for_duration.as_deref(), Some("5m"));
    }

    #[test]
    fn test_serialize_omits_kind_and_empty_fields() {
        let rule: CheckRule =
            serde_yaml::from_str("kind: CheckRule\nname: r1\nexpression: up==0\n").unwrap();
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json, serde_json::json!({"name": "r1", "expression": "up==0"}));
    }

    #[test]
    fn test_for_field_name_on_wire() {
        let rule = CheckRule {
            name: "r".to_string(),
            expression: "up".to_string(),
            for_duration: Some("1m".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["for"], "1m");
    }
}
