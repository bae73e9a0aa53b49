use anyhow::{Context, Result};
use std::path::Path;

use jot::config::JotConfig;
use jot::journal::transfer;

use super::open_store;

/// Import entries from an export file.
///
/// Entries whose id already exists are skipped. A file that fails to parse
/// leaves the journal untouched.
pub fn import(config: &JotConfig, file: &Path) -> Result<()> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read import file: {}", file.display()))?;

    let mut store = open_store(config)?;
    let report = transfer::import_json(&mut store, &json)?;

    println!(
        "Import complete: {} imported, {} skipped (already present).",
        report.imported, report.skipped
    );
    if report.templates_reseated > 0 || report.templates_demoted > 0 {
        println!(
            "Templates: {} kept, {} turned into ordinary entries (no free slot).",
            report.templates_reseated, report.templates_demoted
        );
    }
    Ok(())
}
