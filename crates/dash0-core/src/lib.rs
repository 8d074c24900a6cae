//! Dash0 Core - asset types shared by the Dash0 CLI crates
//!
//! This crate provides the data model the rest of the workspace works on:
//! - `AssetKind`: the closed set of kinds the CLI understands
//! - `AssetId`: the upsert identity of an asset
//! - Native assets: `Dashboard`, `CheckRule`, `View`, `SyntheticCheck`
//! - `PrometheusRule`: the foreign CRD shape that expands into check rules
//! - `Asset`: a tagged union over the native assets

pub mod asset;
pub mod check_rule;
pub mod dashboard;
pub mod error;
pub mod id;
pub mod kind;
pub mod labels;
pub mod prometheus;
pub mod synthetic_check;
pub mod view;

pub use asset::{Asset, NativeAsset, Permission};
pub use check_rule::CheckRule;
pub use dashboard::{Dashboard, DashboardExtensions, DashboardMetadata};
pub use error::{CoreError, Result};
pub use id::AssetId;
pub use kind::{AssetKind, IdentityPolicy, normalize_kind};
pub use labels::LabeledMetadata;
pub use prometheus::{PrometheusRule, PrometheusRuleSpec, Rule, RuleGroup};
pub use synthetic_check::{Schedule, SyntheticCheck, SyntheticCheckSpec, SyntheticPlugin};
pub use view::{View, ViewDisplay, ViewSpec};
