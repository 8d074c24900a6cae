//! CLI commands

pub mod apply;
pub mod assets;
pub mod config;

use dash0_api::{CliConfig, Connection, ConnectionFlags, HttpAssetService};

use crate::error::Result;

/// Resolve the connection and build an API client
pub fn connect(flags: &ConnectionFlags) -> Result<(HttpAssetService, Connection)> {
    let config = CliConfig::load()?;
    let connection = Connection::resolve(&config, flags)?;
    tracing::debug!(
        api_url = %connection.api_url,
        dataset = connection.dataset.as_deref().unwrap_or("default"),
        "resolved connection"
    );
    let service = HttpAssetService::from_connection(&connection)?;
    Ok((service, connection))
}
