//! PrometheusRule handler
//!
//! A PrometheusRule is never sent to the API. Each alerting rule in it
//! becomes one check rule; recording rules have no check rule equivalent and
//! are skipped.
//!
//! The resource's `dash0.com/id` label (or, without one, its name) is the
//! bundle identity. Every expanded rule is keyed by
//! `<bundle>-<group>-<alert>`, so applying the same resource again updates
//! the same check rules.

use dash0_core::labels::ID_LABEL;
use dash0_core::{Asset, AssetId, AssetKind, CheckRule, PrometheusRule, Rule, RuleGroup};
use std::collections::BTreeMap;

use super::check_rule::CheckRuleHandler;
use super::{AssetHandler, Converted, decode};
use crate::error::{ApplyError, Result};
use crate::loader::RawDocument;

const SUMMARY_ANNOTATION: &str = "summary";
const DESCRIPTION_ANNOTATION: &str = "description";

pub struct PrometheusRuleHandler;

impl PrometheusRuleHandler {
    /// Identity shared by every rule of the resource
    pub fn bundle_id(bundle: &PrometheusRule) -> Option<AssetId> {
        bundle
            .metadata
            .labels
            .get(ID_LABEL)
            .and_then(|id| AssetId::new(id.trim()))
            .or_else(|| AssetId::new(slug(&bundle.metadata.name)))
    }

    /// Expand every alerting rule into a check rule with its own key
    pub fn expand(bundle: &PrometheusRule) -> Vec<CheckRule> {
        let bundle_id = Self::bundle_id(bundle);
        let mut seen: BTreeMap<String, usize> = BTreeMap::new();

        bundle
            .spec
            .groups
            .iter()
            .flat_map(|group| group.rules.iter().map(move |rule| (group, rule)))
            .filter_map(|(group, rule)| {
                let alert = rule.alert_name()?;
                let id = bundle_id
                    .as_ref()
                    .and_then(|bundle_id| rule_key(bundle_id, &group.name, alert, &mut seen));
                Some(to_check_rule(group, rule, alert, id))
            })
            .collect()
    }
}

/// `<bundle>-<group>-<alert>`, with a counter for repeated alert names
fn rule_key(
    bundle_id: &AssetId,
    group: &str,
    alert: &str,
    seen: &mut BTreeMap<String, usize>,
) -> Option<AssetId> {
    let base = [bundle_id.as_str(), group, alert]
        .iter()
        .map(|part| slug(part))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    let count = seen.entry(base.clone()).or_insert(0);
    *count += 1;
    match *count {
        1 => AssetId::new(base),
        n => AssetId::new(format!("{}-{}", base, n)),
    }
}

/// Lowercase ASCII letters and digits, everything else folded into single dashes
fn slug(s: &str) -> String {
    s.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

fn to_check_rule(group: &RuleGroup, rule: &Rule, alert: &str, id: Option<AssetId>) -> CheckRule {
    let mut annotations = rule.annotations.clone();
    let summary = annotations.remove(SUMMARY_ANNOTATION);
    let description = annotations.remove(DESCRIPTION_ANNOTATION);

    CheckRule {
        id,
        name: alert.to_string(),
        expression: rule.expr.clone(),
        for_duration: rule.for_duration.clone(),
        interval: group.interval.clone(),
        keep_firing_for: rule.keep_firing_for.clone(),
        summary,
        description,
        labels: rule.labels.clone(),
        annotations,
        ..Default::default()
    }
}

impl AssetHandler for PrometheusRuleHandler {
    fn kind(&self) -> AssetKind {
        AssetKind::PrometheusRule
    }

    fn convert(&self, document: &RawDocument) -> Result<Converted> {
        let bundle: PrometheusRule = decode(AssetKind::PrometheusRule, document)?;

        let total: usize = bundle.spec.groups.iter().map(|g| g.rules.len()).sum();
        let alerting = bundle.alerting_rule_count();
        let skipped = total - alerting;
        if skipped > 0 {
            tracing::warn!(
                name = %bundle.metadata.name,
                skipped,
                "skipping rules without an alert name; recording rules are not supported"
            );
        }

        if alerting == 0 {
            return Err(ApplyError::Conversion {
                location: document.location(),
                message: format!(
                    "no alerting rules found in PrometheusRule \"{}\"; recording rules are not supported",
                    bundle.metadata.name
                ),
            });
        }

        Ok(Converted {
            name: bundle.metadata.name.clone(),
            assets: Self::expand(&bundle).into_iter().map(Asset::from).collect(),
            bundle_id: Self::bundle_id(&bundle),
        })
    }

    fn sanitize(&self, asset: Asset) -> Asset {
        // expanded rules are check rules and sanitized as such
        CheckRuleHandler.sanitize(asset)
    }
}
