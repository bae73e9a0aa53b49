use anyhow::Result;
use chrono::NaiveDate;

use jot::config::JotConfig;
use jot::journal::store::EntryFilter;

use super::{format_date, open_store};

/// Print matching entries, newest first, one per line.
pub fn list(
    config: &JotConfig,
    search: Option<String>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    templates_only: bool,
) -> Result<()> {
    let store = open_store(config)?;
    let filter = EntryFilter {
        text: search,
        from,
        to,
        templates_only,
    };
    let entries = store.filter(&filter);

    if entries.is_empty() {
        println!("No entries found.");
        return Ok(());
    }

    for entry in &entries {
        let marker = entry
            .template_order()
            .map(|slot| format!("  [template {}]", slot + 1))
            .unwrap_or_default();
        println!(
            "{}  {}  {:>5}w  {}{}",
            entry.id(),
            format_date(entry.date()),
            entry.word_count(),
            entry.display_name(),
            marker
        );
    }
    eprintln!("{} of {} entries.", entries.len(), store.len());
    Ok(())
}
