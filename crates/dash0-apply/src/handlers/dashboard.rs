//! Dashboard handler

use dash0_core::{Asset, AssetKind, Dashboard};

use super::{AssetHandler, Converted, decode};
use crate::error::Result;
use crate::loader::RawDocument;

pub struct DashboardHandler;

impl AssetHandler for DashboardHandler {
    fn kind(&self) -> AssetKind {
        AssetKind::Dashboard
    }

    fn convert(&self, document: &RawDocument) -> Result<Converted> {
        let dashboard: Dashboard = decode(AssetKind::Dashboard, document)?;
        Ok(Converted::single(dashboard.into()))
    }

    fn sanitize(&self, asset: Asset) -> Asset {
        let mut dashboard = match asset {
            Asset::Dashboard(dashboard) => dashboard,
            other => return other,
        };

        let meta = &mut dashboard.metadata;
        meta.created_at = None;
        meta.updated_at = None;
        meta.version = None;

        if let Some(ext) = meta.dash0_extensions.as_mut() {
            ext.dataset = None;
            ext.origin = None;
            ext.permissions = None;
            if ext.is_empty() {
                meta.dash0_extensions = None;
            }
        }

        Asset::Dashboard(dashboard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::parse_stream;

    #[test]
    fn test_sanitize_keeps_identity_and_spec() {
        let yaml = r#"
kind: Dashboard
metadata:
  name: checkout
  createdAt: "2024-05-01T10:00:00Z"
  updatedAt: "2024-05-02T10:00:00Z"
  version: 7
  dash0Extensions:
    id: d-1
    dataset: default
    origin: terraform
    permissions:
      - role: admin
        actions: [read]
spec:
  display:
    name: Checkout
"#;
        let doc = parse_stream(yaml, None).unwrap().remove(0);
        let converted = DashboardHandler.convert(&doc).unwrap();
        assert_eq!(converted.name, "Checkout");

        let asset = DashboardHandler.sanitize(converted.assets[0].clone());
        let json = asset.to_json().unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "kind": "Dashboard",
                "metadata": {
                    "name": "checkout",
                    "dash0Extensions": {"id": "d-1"}
                },
                "spec": {"display": {"name": "Checkout"}}
            })
        );
    }

    #[test]
    fn test_sanitize_drops_emptied_extensions() {
        let yaml = "kind: Dashboard\nmetadata:\n  name: x\n  dash0Extensions:\n    dataset: prod\n";
        let doc = parse_stream(yaml, None).unwrap().remove(0);
        let asset = DashboardHandler.sanitize(DashboardHandler.convert(&doc).unwrap().assets.remove(0));

        let Asset::Dashboard(dashboard) = asset else {
            panic!("expected a dashboard");
        };
        assert!(dashboard.metadata.dash0_extensions.is_none());
    }
}
