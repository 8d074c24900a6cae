//! Identity resolution
//!
//! Decides whether a write creates or updates an asset, and settles the
//! identity the write carries.

use dash0_api::{ApiError, AssetService};
use dash0_core::{Asset, AssetId, IdentityPolicy};
use std::fmt;

/// Whether a write creates a new asset or replaces an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Created,
    Updated,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Created => "created",
            Action::Updated => "updated",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the identity an asset carries came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentitySource {
    /// Written in the document, typically by an earlier export
    Document,
    /// Computed from the document, e.g. the per-rule keys of a bundle
    Derived,
}

/// Probe for the asset's identity and settle the identity to write with
///
/// - No identity: `Created`.
/// - Identity found on the server: `Updated`, identity kept.
/// - Identity not found: `Created`. A document identity (deleted since
///   export) is dropped; a derived one is kept so the next run finds it.
/// - Any other lookup failure is returned.
///
/// Kinds with a client-minted identity get a fresh one when none is left.
pub async fn resolve_identity(
    service: &dyn AssetService,
    asset: Asset,
    source: IdentitySource,
    dataset: Option<&str>,
) -> Result<(Asset, Action), ApiError> {
    let kind = asset.kind();

    let asset = match asset.asset_id() {
        None => asset,
        Some(id) => match service.get(kind, &id, dataset).await {
            Ok(_) => {
                tracing::debug!(%kind, %id, "asset exists, updating");
                return Ok((asset, Action::Updated));
            }
            Err(e) if e.is_not_found() && source == IdentitySource::Derived => {
                tracing::debug!(%kind, %id, "derived identity not found, creating");
                return Ok((asset, Action::Created));
            }
            Err(e) if e.is_not_found() => {
                tracing::warn!(
                    %kind,
                    %id,
                    name = asset.name(),
                    "identity no longer exists on the server, creating a new asset"
                );
                asset.with_asset_id(None)
            }
            Err(e) => return Err(e),
        },
    };

    let asset = match kind.identity_policy() {
        IdentityPolicy::ClientMinted => {
            let id = AssetId::mint();
            tracing::debug!(%kind, %id, "minted identity");
            asset.with_asset_id(Some(id))
        }
        IdentityPolicy::ServerAssigned => asset,
    };

    Ok((asset, Action::Created))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dash0_api::MockAssetService;
    use dash0_core::{CheckRule, View};

    fn rule(id: Option<&str>) -> Asset {
        Asset::CheckRule(CheckRule {
            id: id.and_then(AssetId::new),
            name: "r1".to_string(),
            expression: "up == 0".to_string(),
            ..Default::default()
        })
    }

    fn view(id: Option<&str>) -> Asset {
        let view: View = serde_yaml::from_str("kind: Dash0View\nmetadata:\n  name: v\n").unwrap();
        Asset::View(view).with_asset_id(id.and_then(AssetId::new))
    }

    #[tokio::test]
    async fn test_without_identity_skips_lookup() {
        let mock = MockAssetService::new();
        let (asset, action) = resolve_identity(&mock, rule(None), IdentitySource::Document, None)
            .await
            .unwrap();

        assert_eq!(action, Action::Created);
        assert!(asset.asset_id().is_none());
        assert_eq!(mock.operation_counts().gets, 0);
    }

    #[tokio::test]
    async fn test_client_minted_kind_gets_identity() {
        let mock = MockAssetService::new();
        let (asset, action) = resolve_identity(&mock, view(None), IdentitySource::Document, None)
            .await
            .unwrap();

        assert_eq!(action, Action::Created);
        assert!(asset.asset_id().is_some());
    }

    #[tokio::test]
    async fn test_existing_identity_is_update() {
        let mock = MockAssetService::new();
        mock.insert(rule(Some("r-1")));

        let (asset, action) = resolve_identity(&mock, rule(Some("r-1")), IdentitySource::Document, None)
            .await
            .unwrap();
        assert_eq!(action, Action::Updated);
        assert_eq!(asset.asset_id().unwrap().as_str(), "r-1");
        assert_eq!(mock.operation_counts().gets, 1);
    }

    #[tokio::test]
    async fn test_stale_identity_is_dropped() {
        let mock = MockAssetService::new();
        let (asset, action) = resolve_identity(&mock, rule(Some("gone")), IdentitySource::Document, None)
            .await
            .unwrap();
        assert_eq!(action, Action::Created);
        assert!(asset.asset_id().is_none());
    }

    #[tokio::test]
    async fn test_stale_identity_is_replaced_for_minted_kinds() {
        let mock = MockAssetService::new();
        let (asset, action) = resolve_identity(&mock, view(Some("gone")), IdentitySource::Document, None)
            .await
            .unwrap();
        assert_eq!(action, Action::Created);
        let id = asset.asset_id().unwrap();
        assert_ne!(id.as_str(), "gone");
    }

    #[tokio::test]
    async fn test_other_lookup_failures_propagate() {
        let mock = MockAssetService::new();
        mock.fail_next_get(403);

        let err = resolve_identity(&mock, rule(Some("r-1")), IdentitySource::Document, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden { .. }));
        assert_eq!(mock.operation_counts().upserts, 0);
    }

    #[tokio::test]
    async fn test_missing_derived_identity_is_kept() {
        let mock = MockAssetService::new();
        let (asset, action) = resolve_identity(
            &mock,
            rule(Some("bundle-1-api-apidown")),
            IdentitySource::Derived,
            None,
        )
        .await
        .unwrap();

        assert_eq!(action, Action::Created);
        assert_eq!(asset.asset_id().unwrap().as_str(), "bundle-1-api-apidown");
        assert_eq!(mock.operation_counts().gets, 1);
    }
}
