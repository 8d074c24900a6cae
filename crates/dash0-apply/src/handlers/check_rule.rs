//! Check rule handler

use dash0_core::{Asset, AssetKind, CheckRule};

use super::{AssetHandler, Converted, decode};
use crate::error::Result;
use crate::loader::RawDocument;

pub struct CheckRuleHandler;

impl CheckRuleHandler {
    pub(crate) fn strip(rule: CheckRule) -> CheckRule {
        CheckRule {
            kind: None,
            dataset: None,
            origin: None,
            created_at: None,
            updated_at: None,
            version: None,
            permissions: None,
            ..rule
        }
    }
}

impl AssetHandler for CheckRuleHandler {
    fn kind(&self) -> AssetKind {
        AssetKind::CheckRule
    }

    fn convert(&self, document: &RawDocument) -> Result<Converted> {
        let rule: CheckRule = decode(AssetKind::CheckRule, document)?;
        Ok(Converted::single(rule.into()))
    }

    fn sanitize(&self, asset: Asset) -> Asset {
        match asset {
            Asset::CheckRule(rule) => Asset::CheckRule(Self::strip(rule)),
            other => other,
        }
    }
}
