//! Synthetic check handler

use dash0_core::{Asset, AssetKind, SyntheticCheck};

use super::{AssetHandler, Converted, decode, strip_labeled_metadata};
use crate::error::Result;
use crate::loader::RawDocument;

pub struct SyntheticCheckHandler;

impl AssetHandler for SyntheticCheckHandler {
    fn kind(&self) -> AssetKind {
        AssetKind::SyntheticCheck
    }

    fn convert(&self, document: &RawDocument) -> Result<Converted> {
        let check: SyntheticCheck = decode(AssetKind::SyntheticCheck, document)?;
        Ok(Converted::single(check.into()))
    }

    fn sanitize(&self, asset: Asset) -> Asset {
        match asset {
            Asset::SyntheticCheck(mut check) => {
                strip_labeled_metadata(&mut check.metadata);
                check.spec.permissions = None;
                Asset::SyntheticCheck(check)
            }
            other => other,
        }
    }
}
