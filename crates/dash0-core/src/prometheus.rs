//! PrometheusRule custom resources (`monitoring.coreos.com/v1`)
//!
//! Only the fields needed to expand alerting rules into check rules are
//! modelled; everything else in the CRD is ignored.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrometheusRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    #[serde(default)]
    pub kind: String,

    #[serde(default)]
    pub metadata: ObjectMeta,

    #[serde(default)]
    pub spec: PrometheusRuleSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrometheusRuleSpec {
    #[serde(default)]
    pub groups: Vec<RuleGroup>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleGroup {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,

    #[serde(default)]
    pub rules: Vec<Rule>,
}

/// A single rule; alerting rules set `alert`, recording rules set `record`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<String>,

    #[serde(default)]
    pub expr: String,

    #[serde(rename = "for", default, skip_serializing_if = "Option::is_none")]
    pub for_duration: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_firing_for: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

impl Rule {
    /// Alert name, if this is an alerting rule
    pub fn alert_name(&self) -> Option<&str> {
        self.alert.as_deref().filter(|a| !a.trim().is_empty())
    }
}

impl PrometheusRule {
    pub fn alerting_rule_count(&self) -> usize {
        self.spec
            .groups
            .iter()
            .flat_map(|g| &g.rules)
            .filter(|r| r.alert_name().is_some())
            .count()
    }
}
