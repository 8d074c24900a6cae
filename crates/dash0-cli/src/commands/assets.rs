//! List, get and delete commands shared by every native asset kind

use clap::ValueEnum;
use dash0_api::{AssetService, ConnectionFlags};
use dash0_core::{AssetId, AssetKind};

use crate::display;
use crate::error::{CliError, Result};

/// Output format for `get`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

fn parse_id(id: &str) -> Result<AssetId> {
    AssetId::new(id.trim()).ok_or_else(|| CliError::usage("asset id must not be empty"))
}

pub async fn list(kind: AssetKind, flags: &ConnectionFlags) -> Result<()> {
    let (service, connection) = super::connect(flags)?;
    list_with(&service, kind, connection.dataset.as_deref()).await
}

pub async fn get(
    kind: AssetKind,
    id: &str,
    format: OutputFormat,
    flags: &ConnectionFlags,
) -> Result<()> {
    let id = parse_id(id)?;
    let (service, connection) = super::connect(flags)?;
    let rendered = render(&service, kind, &id, format, connection.dataset.as_deref()).await?;
    print!("{}", rendered);
    Ok(())
}

pub async fn delete(kind: AssetKind, id: &str, flags: &ConnectionFlags) -> Result<()> {
    let id = parse_id(id)?;
    let (service, connection) = super::connect(flags)?;
    service
        .delete(kind, &id, connection.dataset.as_deref())
        .await?;
    display::success(format!("Deleted {} \"{}\"", kind.display_name(), id));
    Ok(())
}

async fn list_with(service: &dyn AssetService, kind: AssetKind, dataset: Option<&str>) -> Result<()> {
    let assets = service.list(kind, dataset).await?;
    display::print_asset_table(&assets);
    Ok(())
}

/// Fetch one asset and render it as a document `dash0 apply` accepts
async fn render(
    service: &dyn AssetService,
    kind: AssetKind,
    id: &AssetId,
    format: OutputFormat,
    dataset: Option<&str>,
) -> Result<String> {
    let asset = service.get(kind, id, dataset).await?;
    let document = asset.to_document()?;
    let rendered = match format {
        OutputFormat::Yaml => serde_yaml::to_string(&document)?,
        OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(&document)?),
    };
    Ok(rendered)
}
