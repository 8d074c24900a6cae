//! Mock asset service for testing
//!
//! Keeps assets in memory and behaves like the API where the apply engine
//! can observe it: server-managed fields are stamped on every stored copy,
//! creates without an identity get one assigned, and soft-deleted assets
//! answer `get` with NotFound.

use async_trait::async_trait;
use chrono::Utc;
use dash0_core::labels::{
    CREATED_AT_ANNOTATION, DATASET_LABEL, ORIGIN_LABEL, UPDATED_AT_ANNOTATION, VERSION_LABEL,
};
use dash0_core::{Asset, AssetId, AssetKind, DashboardExtensions, LabeledMetadata, Permission};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{ApiError, Result};
use crate::service::AssetService;

/// Origin marker stamped on stored assets
pub const MOCK_ORIGIN: &str = "mock";

#[derive(Debug, Clone)]
struct StoredAsset {
    asset: Asset,
    deleted: bool,
}

/// Counts of operations performed for testing assertions
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OperationCounts {
    pub gets: usize,
    pub lists: usize,
    pub upserts: usize,
    pub deletes: usize,
}

#[derive(Debug, Default)]
struct Faults {
    /// 1-based upsert call that fails, with the HTTP status to simulate
    upsert: Option<(usize, u16)>,
    /// Status for the next `get`
    next_get: Option<u16>,
}

/// In-memory asset service
#[derive(Clone, Default)]
pub struct MockAssetService {
    /// Storage: (kind, id) -> stored asset
    store: Arc<RwLock<BTreeMap<(AssetKind, AssetId), StoredAsset>>>,
    /// Every upsert payload, in call order
    writes: Arc<RwLock<Vec<Asset>>>,
    operations: Arc<RwLock<OperationCounts>>,
    faults: Arc<RwLock<Faults>>,
    next_id: Arc<RwLock<u64>>,
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

impl MockAssetService {
    /// Create a new empty mock service
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an asset directly, bypassing counts and recorded writes
    ///
    /// Returns the stored copy, with an identity assigned if it had none.
    pub fn insert(&self, asset: Asset) -> Asset {
        self.store_asset(asset, None)
    }

    /// Mark an asset deleted; `get` answers NotFound afterwards
    pub fn soft_delete(&self, kind: AssetKind, id: &AssetId) -> bool {
        let mut store = write(&self.store);
        match store.get_mut(&(kind, id.clone())) {
            Some(entry) => {
                entry.deleted = true;
                true
            }
            None => false,
        }
    }

    /// Live assets of a kind, ordered by identity
    pub fn stored(&self, kind: AssetKind) -> Vec<Asset> {
        read(&self.store)
            .iter()
            .filter(|((k, _), entry)| *k == kind && !entry.deleted)
            .map(|(_, entry)| entry.asset.clone())
            .collect()
    }

    /// Total number of live assets
    pub fn asset_count(&self) -> usize {
        read(&self.store).values().filter(|e| !e.deleted).count()
    }

    /// Upsert payloads exactly as received
    pub fn writes(&self) -> Vec<Asset> {
        read(&self.writes).clone()
    }

    /// Get operation counts for assertions
    pub fn operation_counts(&self) -> OperationCounts {
        read(&self.operations).clone()
    }

    /// Reset operation counts and recorded writes
    pub fn reset_counts(&self) {
        *write(&self.operations) = OperationCounts::default();
        write(&self.writes).clear();
    }

    /// Make the n-th upsert call (1-based, counted from now on) fail with `status`
    pub fn fail_nth_upsert(&self, n: usize, status: u16) {
        let done = read(&self.operations).upserts;
        write(&self.faults).upsert = Some((done + n, status));
    }

    /// Make the next `get` fail with `status`
    pub fn fail_next_get(&self, status: u16) {
        write(&self.faults).next_get = Some(status);
    }

    fn mint_id(&self, kind: AssetKind) -> AssetId {
        let mut next = write(&self.next_id);
        *next += 1;
        match kind {
            AssetKind::CheckRule => AssetId::new(format!("mock-{}", *next)),
            _ => None,
        }
        .unwrap_or_else(AssetId::mint)
    }

    fn store_asset(&self, asset: Asset, dataset: Option<&str>) -> Asset {
        let kind = asset.kind();
        let id = asset.asset_id().unwrap_or_else(|| self.mint_id(kind));

        let mut store = write(&self.store);
        let previous = store
            .get(&(kind, id.clone()))
            .filter(|entry| !entry.deleted)
            .map(|entry| server_state(&entry.asset));

        let stamp = Stamp {
            dataset: dataset.unwrap_or("default").to_string(),
            version: previous.as_ref().map(|p| p.version + 1).unwrap_or(1),
            created_at: previous
                .map(|p| p.created_at)
                .unwrap_or_else(|| Utc::now().to_rfc3339()),
            updated_at: Utc::now().to_rfc3339(),
        };

        let stored = stamp.apply(asset.with_asset_id(Some(id.clone())));
        store.insert(
            (kind, id),
            StoredAsset {
                asset: stored.clone(),
                deleted: false,
            },
        );
        stored
    }
}

/// Server-managed values carried over from the previous version
struct ServerState {
    version: u64,
    created_at: String,
}

fn server_state(asset: &Asset) -> ServerState {
    let (version, created_at) = match asset {
        Asset::Dashboard(d) => (
            d.metadata.version,
            d.metadata.created_at.map(|t| t.to_rfc3339()),
        ),
        Asset::CheckRule(r) => (r.version, r.created_at.map(|t| t.to_rfc3339())),
        Asset::View(v) => labeled_state(&v.metadata),
        Asset::SyntheticCheck(s) => labeled_state(&s.metadata),
    };
    ServerState {
        version: version.unwrap_or(0),
        created_at: created_at.unwrap_or_else(|| Utc::now().to_rfc3339()),
    }
}

fn labeled_state(meta: &LabeledMetadata) -> (Option<u64>, Option<String>) {
    (
        meta.labels.get(VERSION_LABEL).and_then(|v| v.parse().ok()),
        meta.annotations.get(CREATED_AT_ANNOTATION).cloned(),
    )
}

fn admin_permissions() -> Vec<Permission> {
    let mut subject = BTreeMap::new();
    subject.insert("role".to_string(), Value::String("admin".to_string()));
    vec![Permission {
        actions: vec!["read".to_string(), "write".to_string()],
        subject,
    }]
}

/// Server-managed values written onto a stored copy
struct Stamp {
    dataset: String,
    version: u64,
    created_at: String,
    updated_at: String,
}

impl Stamp {
    fn timestamp(value: &str) -> Option<chrono::DateTime<Utc>> {
        chrono::DateTime::parse_from_rfc3339(value)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }

    fn apply_labels(&self, meta: &mut LabeledMetadata) {
        meta.labels
            .insert(DATASET_LABEL.to_string(), self.dataset.clone());
        meta.labels
            .insert(ORIGIN_LABEL.to_string(), MOCK_ORIGIN.to_string());
        meta.labels
            .insert(VERSION_LABEL.to_string(), self.version.to_string());
        meta.annotations
            .insert(CREATED_AT_ANNOTATION.to_string(), self.created_at.clone());
        meta.annotations
            .insert(UPDATED_AT_ANNOTATION.to_string(), self.updated_at.clone());
    }

    fn apply(&self, asset: Asset) -> Asset {
        match asset {
            Asset::Dashboard(mut d) => {
                d.metadata.version = Some(self.version);
                d.metadata.created_at = Self::timestamp(&self.created_at);
                d.metadata.updated_at = Self::timestamp(&self.updated_at);
                let ext = d
                    .metadata
                    .dash0_extensions
                    .get_or_insert_with(DashboardExtensions::default);
                ext.dataset = Some(self.dataset.clone());
                ext.origin = Some(MOCK_ORIGIN.to_string());
                ext.permissions = Some(admin_permissions());
                Asset::Dashboard(d)
            }
            Asset::CheckRule(mut r) => {
                r.version = Some(self.version);
                r.created_at = Self::timestamp(&self.created_at);
                r.updated_at = Self::timestamp(&self.updated_at);
                r.dataset = Some(self.dataset.clone());
                r.origin = Some(MOCK_ORIGIN.to_string());
                r.permissions = Some(admin_permissions());
                Asset::CheckRule(r)
            }
            Asset::View(mut v) => {
                self.apply_labels(&mut v.metadata);
                v.spec.permissions = Some(admin_permissions());
                Asset::View(v)
            }
            Asset::SyntheticCheck(mut s) => {
                self.apply_labels(&mut s.metadata);
                s.spec.permissions = Some(admin_permissions());
                Asset::SyntheticCheck(s)
            }
        }
    }
}

fn ensure_native(kind: AssetKind) -> Result<()> {
    if kind.is_native() {
        Ok(())
    } else {
        Err(ApiError::UnsupportedKind { kind })
    }
}

#[async_trait]
impl AssetService for MockAssetService {
    async fn get(&self, kind: AssetKind, id: &AssetId, _dataset: Option<&str>) -> Result<Asset> {
        ensure_native(kind)?;
        write(&self.operations).gets += 1;

        if let Some(status) = write(&self.faults).next_get.take() {
            return Err(ApiError::from_status(
                status,
                kind,
                Some(id.as_str()),
                "injected failure",
                None,
            ));
        }

        read(&self.store)
            .get(&(kind, id.clone()))
            .filter(|entry| !entry.deleted)
            .map(|entry| entry.asset.clone())
            .ok_or_else(|| ApiError::NotFound {
                kind,
                id: id.to_string(),
            })
    }

    async fn upsert(&self, asset: &Asset, dataset: Option<&str>) -> Result<Asset> {
        ensure_native(asset.kind())?;
        let call = {
            let mut ops = write(&self.operations);
            ops.upserts += 1;
            ops.upserts
        };
        write(&self.writes).push(asset.clone());

        let fault = read(&self.faults).upsert;
        if let Some((n, status)) = fault {
            if n == call {
                write(&self.faults).upsert = None;
                let id = asset.asset_id();
                return Err(ApiError::from_status(
                    status,
                    asset.kind(),
                    id.as_ref().map(AssetId::as_str),
                    "injected failure",
                    None,
                ));
            }
        }

        Ok(self.store_asset(asset.clone(), dataset))
    }

    async fn list(&self, kind: AssetKind, _dataset: Option<&str>) -> Result<Vec<Asset>> {
        ensure_native(kind)?;
        write(&self.operations).lists += 1;
        Ok(self.stored(kind))
    }

    async fn delete(&self, kind: AssetKind, id: &AssetId, _dataset: Option<&str>) -> Result<()> {
        ensure_native(kind)?;
        write(&self.operations).deletes += 1;

        let removed = write(&self.store).remove(&(kind, id.clone()));
        match removed {
            Some(entry) if !entry.deleted => Ok(()),
            _ => Err(ApiError::NotFound {
                kind,
                id: id.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dash0_core::{CheckRule, View};

    fn rule(id: Option<&str>) -> Asset {
        Asset::CheckRule(CheckRule {
            id: id.and_then(AssetId::new),
            name: "r1".to_string(),
            expression: "up == 0".to_string(),
            ..Default::default()
        })
    }

    fn view(id: &str) -> Asset {
        let view: View = serde_yaml::from_str(&format!(
            "kind: Dash0View\nmetadata:\n  name: errors\n  labels:\n    dash0.com/id: {}\n",
            id
        ))
        .unwrap();
        Asset::View(view)
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_stamps() {
        let mock = MockAssetService::new();
        let stored = mock.upsert(&rule(None), Some("staging")).await.unwrap();

        let Asset::CheckRule(stored) = stored else {
            panic!("expected a check rule");
        };
        assert_eq!(stored.id.as_ref().unwrap().as_str(), "mock-1");
        assert_eq!(stored.version, Some(1));
        assert_eq!(stored.dataset.as_deref(), Some("staging"));
        assert_eq!(stored.origin.as_deref(), Some(MOCK_ORIGIN));
        assert!(stored.created_at.is_some());
        assert!(stored.permissions.is_some());

        // the recorded payload is what was sent, not what was stored
        let writes = mock.writes();
        assert_eq!(writes.len(), 1);
        assert!(writes[0].asset_id().is_none());
    }

    #[tokio::test]
    async fn test_update_increments_version() {
        let mock = MockAssetService::new();
        mock.upsert(&view("v-1"), None).await.unwrap();
        let stored = mock.upsert(&view("v-1"), None).await.unwrap();

        let Asset::View(stored) = stored else {
            panic!("expected a view");
        };
        assert_eq!(stored.metadata.labels[VERSION_LABEL], "2");
        assert_eq!(stored.metadata.labels[DATASET_LABEL], "default");
        assert_eq!(mock.stored(AssetKind::View).len(), 1);
    }

    #[tokio::test]
    async fn test_soft_delete_hides_asset() {
        let mock = MockAssetService::new();
        let id = AssetId::new("v-1").unwrap();
        mock.insert(view("v-1"));
        assert!(mock.get(AssetKind::View, &id, None).await.is_ok());

        assert!(mock.soft_delete(AssetKind::View, &id));
        let err = mock.get(AssetKind::View, &id, None).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(mock.asset_count(), 0);
    }

    #[tokio::test]
    async fn test_fail_nth_upsert() {
        let mock = MockAssetService::new();
        mock.fail_nth_upsert(2, 503);

        assert!(mock.upsert(&rule(None), None).await.is_ok());
        let err = mock.upsert(&rule(None), None).await.unwrap_err();
        assert!(matches!(err, ApiError::Server { status: 503, .. }));
        assert!(mock.upsert(&rule(None), None).await.is_ok());

        assert_eq!(mock.operation_counts().upserts, 3);
        assert_eq!(mock.stored(AssetKind::CheckRule).len(), 2);
    }

    #[tokio::test]
    async fn test_fail_next_get() {
        let mock = MockAssetService::new();
        mock.insert(rule(Some("r-1")));
        mock.fail_next_get(401);

        let id = AssetId::new("r-1").unwrap();
        let err = mock.get(AssetKind::CheckRule, &id, None).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized { .. }));
        assert!(mock.get(AssetKind::CheckRule, &id, None).await.is_ok());
        assert_eq!(mock.operation_counts().gets, 2);
    }

    #[tokio::test]
    async fn test_delete_and_list() {
        let mock = MockAssetService::new();
        mock.insert(rule(Some("a")));
        mock.insert(rule(Some("b")));
        assert_eq!(mock.list(AssetKind::CheckRule, None).await.unwrap().len(), 2);

        let id = AssetId::new("a").unwrap();
        mock.delete(AssetKind::CheckRule, &id, None).await.unwrap();
        assert!(mock.delete(AssetKind::CheckRule, &id, None).await.is_err());
        assert_eq!(mock.list(AssetKind::CheckRule, None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rejects_prometheus_rule() {
        let mock = MockAssetService::new();
        let err = mock
            .list(AssetKind::PrometheusRule, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::UnsupportedKind { .. }));
    }
}
