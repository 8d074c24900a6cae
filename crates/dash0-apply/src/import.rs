//! Single-asset import: sanitize, resolve identity, upsert

use dash0_api::AssetService;
use dash0_core::{Asset, AssetId, AssetKind};

use crate::error::{ApplyError, Operation, Result};
use crate::handlers::HandlerRegistry;
use crate::identity::{Action, IdentitySource, resolve_identity};

/// Outcome of writing one native asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportResult {
    pub kind: AssetKind,
    /// Name as reported by the server
    pub name: String,
    /// Identity of the stored asset
    pub id: Option<AssetId>,
    /// Identity of the bundle the asset was expanded from
    pub bundle_id: Option<AssetId>,
    pub action: Action,
}

/// Writes native assets through an [`AssetService`]
pub struct Importer<'a> {
    service: &'a dyn AssetService,
    registry: &'a HandlerRegistry,
    dataset: Option<&'a str>,
}

impl<'a> Importer<'a> {
    pub fn new(
        service: &'a dyn AssetService,
        registry: &'a HandlerRegistry,
        dataset: Option<&'a str>,
    ) -> Self {
        Self {
            service,
            registry,
            dataset,
        }
    }

    /// Import one asset
    ///
    /// Server-managed fields are stripped before the identity lookup, so
    /// neither the lookup nor the write sees values from an earlier export.
    /// Assets expanded from a bundle pass the bundle's identity; their own
    /// identities are derived and kept when the lookup finds nothing.
    pub async fn import(
        &self,
        asset: Asset,
        bundle_id: Option<&AssetId>,
    ) -> Result<ImportResult> {
        let kind = asset.kind();
        let asset = self.registry.sanitize(asset)?;
        let described = describe(&asset);
        let source = match bundle_id {
            Some(_) => IdentitySource::Derived,
            None => IdentitySource::Document,
        };

        let (asset, action) = resolve_identity(self.service, asset, source, self.dataset)
            .await
            .map_err(|source| ApplyError::Api {
                operation: Operation::Read,
                kind,
                asset: described,
                source,
            })?;

        let operation = match action {
            Action::Created => Operation::Create,
            Action::Updated => Operation::Update,
        };
        tracing::debug!(%kind, name = asset.name(), %action, "writing asset");

        let stored = self
            .service
            .upsert(&asset, self.dataset)
            .await
            .map_err(|source| ApplyError::Api {
                operation,
                kind,
                asset: describe(&asset),
                source,
            })?;

        let result = ImportResult {
            kind,
            name: non_empty(stored.name()).unwrap_or(asset.name()).to_string(),
            id: stored.asset_id().or_else(|| asset.asset_id()),
            bundle_id: bundle_id.cloned(),
            action,
        };
        tracing::info!(
            %kind,
            name = %result.name,
            id = result.id.as_ref().map(AssetId::as_str).unwrap_or(""),
            action = %result.action,
            "applied"
        );
        Ok(result)
    }
}

fn non_empty(s: &str) -> Option<&str> {
    Some(s).filter(|s| !s.is_empty())
}

/// Name or identity used in error messages
fn describe(asset: &Asset) -> String {
    match (non_empty(asset.name()), asset.asset_id()) {
        (Some(name), _) => name.to_string(),
        (None, Some(id)) => id.into_string(),
        (None, None) => "<unnamed>".to_string(),
    }
}
