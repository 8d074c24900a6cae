//! Display formatting for CLI output
//!
//! Line formats are stable: scripts parse the apply report.

use console::style;
use dash0_apply::{DocumentOutcome, PlannedDocument};
use dash0_core::{Asset, AssetId};

/// `<kind> "<name>" <action> (<ids>)`
pub fn outcome_line(outcome: &DocumentOutcome) -> String {
    let ids: Vec<&str> = outcome.ids().into_iter().map(AssetId::as_str).collect();
    let mut line = format!(
        "{} \"{}\" {}",
        outcome.kind.as_str(),
        outcome.name,
        outcome.action_label()
    );
    if !ids.is_empty() {
        line.push_str(&format!(" ({})", ids.join(", ")));
    }
    line
}

/// `<kind> "<name>" would be applied`
pub fn planned_line(planned: &PlannedDocument) -> String {
    format!("{} \"{}\" would be applied", planned.kind.as_str(), planned.name)
}

/// Print the report of an apply run
pub fn print_applied(applied: &[DocumentOutcome]) {
    for outcome in applied {
        println!("{} {}", style("✓").green(), outcome_line(outcome));
    }
}

/// Print the documents applied before a batch failed
pub fn print_applied_before_failure(applied: &[DocumentOutcome]) {
    println!("{}", style("Applied before failure:").yellow().bold());
    for outcome in applied {
        println!("  {} {}", style("→").dim(), outcome_line(outcome));
    }
}

/// Print a dry-run plan
pub fn print_plan(planned: &[PlannedDocument]) {
    for doc in planned {
        println!("{} {}", style("→").cyan(), planned_line(doc));
    }
    println!();
    println!(
        "{} Dry run: {} document(s) valid, nothing applied",
        style("✓").green(),
        planned.len()
    );
}

/// Print a two-column table of asset names and identities
pub fn print_asset_table(assets: &[Asset]) {
    if assets.is_empty() {
        println!("{}", style("No assets found").dim());
        return;
    }

    let rows: Vec<(String, String)> = assets
        .iter()
        .map(|asset| {
            (
                asset.name().to_string(),
                asset.asset_id().map(AssetId::into_string).unwrap_or_default(),
            )
        })
        .collect();
    let width = rows
        .iter()
        .map(|(name, _)| name.chars().count())
        .max()
        .unwrap_or(0)
        .max("NAME".len());

    println!("{}", style(format!("{:<width$}  ID", "NAME", width = width)).bold());
    for (name, id) in rows {
        println!("{:<width$}  {}", name, id, width = width);
    }
}

pub fn success(message: impl std::fmt::Display) {
    println!("{} {}", style("✓").green(), message);
}

pub fn warning(message: impl std::fmt::Display) {
    eprintln!("{} {}", style("⚠").yellow(), message);
}
