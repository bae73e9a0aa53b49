//! CLI `doctor` command: run database diagnostics and print a health report.

use anyhow::{Context, Result};

use jot::config::JotConfig;
use jot::db;
use jot::journal::store::EntryStore;
use jot::journal::templates::template_count;
use jot::journal::types::MAX_TEMPLATES;

/// Run database diagnostics and print a health report.
pub fn doctor(config: &JotConfig) -> Result<()> {
    let db_path = config.resolved_db_path();

    if !db_path.exists() {
        println!("Database: not found at {}", db_path.display());
        println!("Run `jot write` to start your journal.");
        return Ok(());
    }

    let file_size = std::fs::metadata(&db_path)
        .map(|m| m.len())
        .unwrap_or(0);

    let kv = db::KvStore::open(&db_path)
        .context("failed to open database (may be corrupt)")?;

    let report = kv.health().context("failed to run health check")?;

    println!("Jot Health Report");
    println!("=================");
    println!();
    println!("Database:          {}", db_path.display());
    println!("File size:         {}", format_bytes(file_size));
    println!("Schema version:    {}", report.schema_version);
    println!("Stored keys:       {}", report.key_count);
    println!("Entries blob:      {}", format_bytes(report.entries_blob_bytes));
    println!();

    match EntryStore::load(kv) {
        Ok(store) => {
            println!("Entries:           {}", store.len());
            println!(
                "Template slots:    {}/{}",
                template_count(store.entries()),
                MAX_TEMPLATES
            );
        }
        Err(e) => println!("Entries:           UNREADABLE ({e})"),
    }
    println!();
    if report.integrity_ok {
        println!("Integrity check:   PASSED");
    } else {
        println!("Integrity check:   FAILED ({})", report.integrity_details);
    }

    if !report.integrity_ok {
        println!();
        println!("Recovery steps:");
        println!("  1. Restore from a backup: cp backup.db ~/.jot/journal.db");
        println!("  2. Or export from a good copy and reimport:");
        println!("     jot export --output backup.json");
        println!("     jot import backup.json");
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_are_humanized() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }
}
