use anyhow::{Context, Result};
use std::path::Path;

use jot::config::JotConfig;
use jot::journal::transfer;

use super::open_store;

/// Export every entry as JSON to stdout or to `output`.
///
/// File output is written to a temporary sibling and renamed into place.
pub fn export(config: &JotConfig, output: Option<&Path>) -> Result<()> {
    let store = open_store(config)?;
    let json = transfer::export_json(&store)?;

    match output {
        None => println!("{json}"),
        Some(path) => {
            let tmp_path = path.with_extension("tmp");
            std::fs::write(&tmp_path, &json)
                .with_context(|| format!("failed to write temp file: {}", tmp_path.display()))?;
            std::fs::rename(&tmp_path, path)
                .with_context(|| format!("failed to move export into {}", path.display()))?;
        }
    }

    eprintln!("Exported {} entries.", store.len());
    Ok(())
}
