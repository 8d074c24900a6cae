//! Dash0 API - access to the Dash0 asset endpoints
//!
//! This crate provides:
//! - `AssetService`: the trait the apply engine and CLI commands talk to
//! - `HttpAssetService`: the HTTPS implementation
//! - `MockAssetService`: an in-memory implementation for tests
//! - Configuration profiles and connection resolution

pub mod config;
pub mod error;
pub mod http;
pub mod mock;
pub mod service;

pub use config::{CliConfig, Connection, ConnectionFlags, Profile};
pub use error::{ApiError, ErrorCategory, Result};
pub use http::HttpAssetService;
pub use mock::{MockAssetService, OperationCounts};
pub use service::AssetService;
