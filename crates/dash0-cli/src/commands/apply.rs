//! Apply command - create or update assets from YAML documents

use dash0_api::{AssetService, ConnectionFlags};
use dash0_apply::{ApplyOptions, BatchApplier, RawDocument, plan};

use crate::display;
use crate::error::{CliError, Result};

/// Apply every document found at `path` (a file, a directory or `-` for stdin)
pub async fn run(path: &str, dry_run: bool, flags: &ConnectionFlags) -> Result<()> {
    let documents = dash0_apply::load(path)?;
    tracing::debug!(path, count = documents.len(), "loaded documents");

    if dry_run {
        return dry_run_plan(documents);
    }

    let (service, connection) = super::connect(flags)?;
    apply_with(&service, documents, connection.dataset).await
}

fn dry_run_plan(documents: Vec<RawDocument>) -> Result<()> {
    let planned = plan(documents)?;
    display::print_plan(&planned);
    Ok(())
}

/// Apply loaded documents through `service` and print the report
pub async fn apply_with(
    service: &dyn AssetService,
    documents: Vec<RawDocument>,
    dataset: Option<String>,
) -> Result<()> {
    let applier = BatchApplier::new(service, ApplyOptions { dataset });
    let outcome = applier.apply(documents).await;

    match outcome.failure {
        None => {
            display::print_applied(&outcome.applied);
            Ok(())
        }
        Some(failure) if !outcome.applied.is_empty() => {
            display::print_applied_before_failure(&outcome.applied);
            Err(CliError::partial(failure, outcome.applied.len()))
        }
        Some(failure) => Err(failure.into()),
    }
}
