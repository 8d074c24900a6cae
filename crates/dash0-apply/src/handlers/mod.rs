//! Per-kind handlers
//!
//! Each kind has one handler that knows how to decode its documents into
//! native assets and how to strip the fields the server manages. The
//! registry maps every [`AssetKind`] to its handler and is built once.

mod check_rule;
mod dashboard;
mod prometheus;
mod synthetic_check;
mod view;

pub use check_rule::CheckRuleHandler;
pub use dashboard::DashboardHandler;
pub use prometheus::PrometheusRuleHandler;
pub use synthetic_check::SyntheticCheckHandler;
pub use view::ViewHandler;

use dash0_core::labels::{SERVER_MANAGED_ANNOTATIONS, SERVER_MANAGED_LABELS};
use dash0_core::{Asset, AssetId, AssetKind, LabeledMetadata};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

use crate::error::{ApplyError, Result};
use crate::loader::RawDocument;

/// Native assets decoded from one document
#[derive(Debug, Clone, PartialEq)]
pub struct Converted {
    /// Name reported for the document as a whole
    pub name: String,
    pub assets: Vec<Asset>,
    /// Identity shared by assets expanded from one bundle; their own
    /// identities are derived from it and survive a failed lookup
    pub bundle_id: Option<AssetId>,
}

impl Converted {
    pub fn single(asset: Asset) -> Self {
        Self {
            name: asset.name().to_string(),
            assets: vec![asset],
            bundle_id: None,
        }
    }
}

/// Conversion and sanitization for one kind
pub trait AssetHandler: Send + Sync {
    fn kind(&self) -> AssetKind;

    /// Decode a document of this kind into native assets
    fn convert(&self, document: &RawDocument) -> Result<Converted>;

    /// Remove server-managed fields before the asset is looked up or written
    fn sanitize(&self, asset: Asset) -> Asset;
}

/// Handlers by kind
pub struct HandlerRegistry {
    handlers: BTreeMap<AssetKind, Box<dyn AssetHandler>>,
}

impl HandlerRegistry {
    /// Registry with no handlers
    pub fn empty() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }

    /// Registry with the built-in handler of every kind
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(DashboardHandler));
        registry.register(Box::new(CheckRuleHandler));
        registry.register(Box::new(ViewHandler));
        registry.register(Box::new(SyntheticCheckHandler));
        registry.register(Box::new(PrometheusRuleHandler));
        registry
    }

    /// Add or replace the handler for its kind
    pub fn register(&mut self, handler: Box<dyn AssetHandler>) {
        self.handlers.insert(handler.kind(), handler);
    }

    pub fn handler(&self, kind: AssetKind) -> Result<&dyn AssetHandler> {
        self.handlers
            .get(&kind)
            .map(|h| h.as_ref())
            .ok_or(ApplyError::UnsupportedKind { kind })
    }

    pub fn convert(&self, kind: AssetKind, document: &RawDocument) -> Result<Converted> {
        self.handler(kind)?.convert(document)
    }

    /// Sanitize with the handler of the asset's own kind
    pub fn sanitize(&self, asset: Asset) -> Result<Asset> {
        Ok(self.handler(asset.kind())?.sanitize(asset))
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode a document's content as `T`
pub(crate) fn decode<T: DeserializeOwned>(kind: AssetKind, document: &RawDocument) -> Result<T> {
    serde_yaml::from_str(&document.content).map_err(|e| ApplyError::Decode {
        kind,
        location: document.location(),
        message: e.to_string(),
    })
}

/// Strip server-managed labels and annotations
pub(crate) fn strip_labeled_metadata(meta: &mut LabeledMetadata) {
    for label in SERVER_MANAGED_LABELS {
        meta.labels.remove(label);
    }
    for annotation in SERVER_MANAGED_ANNOTATIONS {
        meta.annotations.remove(annotation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_covers_every_kind() {
        let registry = HandlerRegistry::new();
        for kind in AssetKind::ALL {
            assert_eq!(registry.handler(kind).unwrap().kind(), kind);
        }
    }

    #[test]
    fn test_empty_registry_reports_kind() {
        let registry = HandlerRegistry::empty();
        let err = registry.handler(AssetKind::View).err().unwrap();
        assert!(matches!(err, ApplyError::UnsupportedKind { kind: AssetKind::View }));
    }
}
