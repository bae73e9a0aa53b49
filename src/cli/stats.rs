use anyhow::Result;

use jot::config::JotConfig;
use jot::journal::types::MAX_TEMPLATES;

use super::{format_date, open_store};

/// Display journal statistics in the terminal.
pub fn stats(config: &JotConfig) -> Result<()> {
    let store = open_store(config)?;
    let response = store.stats();

    println!("Journal Statistics");
    println!("{}", "=".repeat(40));
    println!("  Total entries:       {}", response.total_entries);
    println!("  Total words:         {}", response.total_words);
    println!("  Average words:       {:.1}", response.average_words);
    println!("  Titled entries:      {}", response.titled);
    println!("  Months written:      {}", response.months);
    println!();
    println!("Templates:             {}/{}", response.templates, MAX_TEMPLATES);

    if let Some(oldest) = response.oldest_entry {
        println!("Oldest entry:          {}", format_date(oldest));
    }
    if let Some(newest) = response.newest_entry {
        println!("Newest entry:          {}", format_date(newest));
    }

    Ok(())
}
