//! View handler

use dash0_core::{Asset, AssetKind, View};

use super::{AssetHandler, Converted, decode, strip_labeled_metadata};
use crate::error::Result;
use crate::loader::RawDocument;

pub struct ViewHandler;

impl AssetHandler for ViewHandler {
    fn kind(&self) -> AssetKind {
        AssetKind::View
    }

    fn convert(&self, document: &RawDocument) -> Result<Converted> {
        let view: View = decode(AssetKind::View, document)?;
        Ok(Converted::single(view.into()))
    }

    fn sanitize(&self, asset: Asset) -> Asset {
        match asset {
            Asset::View(mut view) => {
                strip_labeled_metadata(&mut view.metadata);
                view.spec.permissions = None;
                Asset::View(view)
            }
            other => other,
        }
    }
}
