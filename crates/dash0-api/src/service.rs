//! Asset service trait
//!
//! The single seam between the CLI and the Dash0 API. Implementations:
//! - `HttpAssetService`: the real API over HTTPS
//! - `MockAssetService`: in-memory, for tests and offline runs

use async_trait::async_trait;
use dash0_core::{Asset, AssetId, AssetKind};

use crate::error::Result;

/// Create/read/update/delete access to assets of every native kind
///
/// `dataset` selects the target dataset; `None` means the organization default.
#[async_trait]
pub trait AssetService: Send + Sync {
    /// Read one asset by identity; a missing asset is `ApiError::NotFound`
    async fn get(&self, kind: AssetKind, id: &AssetId, dataset: Option<&str>) -> Result<Asset>;

    /// Create or replace an asset, returning the stored copy
    async fn upsert(&self, asset: &Asset, dataset: Option<&str>) -> Result<Asset>;

    /// List all assets of a kind
    async fn list(&self, kind: AssetKind, dataset: Option<&str>) -> Result<Vec<Asset>>;

    /// Delete one asset by identity
    async fn delete(&self, kind: AssetKind, id: &AssetId, dataset: Option<&str>) -> Result<()>;
}
