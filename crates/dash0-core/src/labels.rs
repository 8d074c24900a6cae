//! Label-encoded metadata shared by views and synthetic checks
//!
//! These kinds use a Kubernetes-style `metadata` block where the identity and
//! the server-managed markers live in well-known labels and annotations.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::id::AssetId;

/// Label carrying the upsert identity
pub const ID_LABEL: &str = "dash0.com/id";

/// Label echoing the dataset the asset lives in (server-managed)
pub const DATASET_LABEL: &str = "dash0.com/dataset";

/// Label marking the asset's origin, e.g. an operator (server-managed)
pub const ORIGIN_LABEL: &str = "dash0.com/origin";

/// Label carrying the version counter (server-managed)
pub const VERSION_LABEL: &str = "dash0.com/version";

/// Annotation carrying the creation timestamp (server-managed)
pub const CREATED_AT_ANNOTATION: &str = "dash0.com/created-at";

/// Annotation carrying the last update timestamp (server-managed)
pub const UPDATED_AT_ANNOTATION: &str = "dash0.com/updated-at";

/// Labels the server populates and rejects on write
pub const SERVER_MANAGED_LABELS: [&str; 3] = [DATASET_LABEL, ORIGIN_LABEL, VERSION_LABEL];

/// Annotations the server populates and rejects on write
pub const SERVER_MANAGED_ANNOTATIONS: [&str; 2] = [CREATED_AT_ANNOTATION, UPDATED_AT_ANNOTATION];

/// Kubernetes-style metadata with label-encoded identity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabeledMetadata {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl LabeledMetadata {
    pub fn asset_id(&self) -> Option<AssetId> {
        self.labels.get(ID_LABEL).cloned().and_then(AssetId::new)
    }

    pub fn set_asset_id(&mut self, id: Option<AssetId>) {
        match id {
            Some(id) => {
                self.labels.insert(ID_LABEL.to_string(), id.into_string());
            }
            None => {
                self.labels.remove(ID_LABEL);
            }
        }
    }
}
