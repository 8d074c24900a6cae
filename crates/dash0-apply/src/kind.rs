//! Kind resolution and batch validation

use dash0_core::{AssetKind, normalize_kind};
use serde_yaml::Value;

use crate::error::{ApplyError, Result, ValidationIssue};
use crate::loader::RawDocument;

const NAME_FIELDS: [&str; 2] = ["name", "alert"];
const EXPRESSION_FIELDS: [&str; 2] = ["expression", "expr"];

/// Determine the normalized kind of a decoded document
///
/// An explicit `kind` wins. Without one, a document that has both a name and
/// an expression is a bare check rule. Anything else resolves to "".
pub fn resolve_kind(value: &Value) -> String {
    let explicit = value
        .get("kind")
        .and_then(Value::as_str)
        .filter(|k| !k.trim().is_empty());
    if let Some(kind) = explicit {
        return normalize_kind(kind);
    }

    if has_string_field(value, &NAME_FIELDS) && has_string_field(value, &EXPRESSION_FIELDS) {
        return normalize_kind(AssetKind::CheckRule.as_str());
    }

    String::new()
}

fn has_string_field(value: &Value, fields: &[&str]) -> bool {
    fields.iter().any(|field| {
        value
            .get(*field)
            .and_then(Value::as_str)
            .is_some_and(|s| !s.trim().is_empty())
    })
}

/// A document whose kind is known to be supported
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedDocument {
    pub kind: AssetKind,
    pub raw: RawDocument,
}

/// Check every document's kind, reporting all problems at once
pub fn validate(documents: Vec<RawDocument>) -> Result<Vec<ValidatedDocument>> {
    let mut issues = Vec::new();
    let mut validated = Vec::with_capacity(documents.len());

    for raw in documents {
        if raw.kind.is_empty() {
            issues.push(ValidationIssue {
                location: raw.location(),
                message: "missing kind".to_string(),
            });
            continue;
        }

        match AssetKind::from_name(&raw.kind) {
            Some(kind) => validated.push(ValidatedDocument { kind, raw }),
            None => issues.push(ValidationIssue {
                location: raw.location(),
                message: format!("unsupported kind \"{}\"", raw.kind),
            }),
        }
    }

    if !issues.is_empty() {
        return Err(ApplyError::Validation { issues });
    }
    Ok(validated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::parse_stream;
    use std::path::PathBuf;

    fn kind_of(yaml: &str) -> String {
        resolve_kind(&serde_yaml::from_str(yaml).unwrap())
    }

    #[test]
    fn test_explicit_kind_aliases() {
        assert_eq!(kind_of("kind: Dash0Dashboard"), "dashboard");
        assert_eq!(kind_of("kind: check-rule"), "checkrule");
        assert_eq!(kind_of("kind: Dash0CheckRule"), "checkrule");
        assert_eq!(kind_of("kind: synthetic-check"), "syntheticcheck");
        assert_eq!(kind_of("kind: Dash0View"), "view");
        assert_eq!(kind_of("kind: PrometheusRule"), "prometheusrule");
    }

    #[test]
    fn test_infers_bare_check_rule() {
        assert_eq!(kind_of("name: r1\nexpression: up == 0\n"), "checkrule");
        assert_eq!(kind_of("alert: r1\nexpr: up == 0\n"), "checkrule");
        assert_eq!(kind_of("name: r1\n"), "");
        assert_eq!(kind_of("kind: \"\"\nname: r1\n"), "");
        assert_eq!(kind_of("- a\n- b\n"), "");
    }

    #[test]
    fn test_validate_accepts_supported_kinds() {
        let docs = parse_stream(
            "kind: Dashboard\n---\nkind: PrometheusRule\n---\nname: r\nexpression: up\n",
            None,
        )
        .unwrap();
        let validated = validate(docs).unwrap();
        let kinds: Vec<_> = validated.iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![
                AssetKind::Dashboard,
                AssetKind::PrometheusRule,
                AssetKind::CheckRule
            ]
        );
    }

    #[test]
    fn test_validate_collects_all_issues() {
        let mut docs = parse_stream(
            "kind: View\n---\nkind: Service\n---\nfoo: bar\n",
            Some(PathBuf::from("assets.yaml")),
        )
        .unwrap();
        docs.extend(parse_stream("kind: Deployment\n", Some(PathBuf::from("other.yaml"))).unwrap());

        let err = validate(docs).unwrap_err();
        insta::assert_snapshot!(err.to_string(), @r#"
        validation failed with 3 errors:
          - assets.yaml (document 2): unsupported kind "service"
          - assets.yaml (document 3): missing kind
          - other.yaml (document 1): unsupported kind "deployment"
        "#);
    }
}
