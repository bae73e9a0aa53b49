use anyhow::{bail, Result};

use jot::config::JotConfig;

use super::{format_date, open_store};

/// Print one entry with its metadata.
pub fn show(config: &JotConfig, id: &str) -> Result<()> {
    let store = open_store(config)?;
    let Some(entry) = store.get(id) else {
        bail!("entry not found: {id}");
    };

    println!("ID:       {}", entry.id());
    println!("Title:    {}", entry.title().unwrap_or("(untitled)"));
    println!("Date:     {}", format_date(entry.date()));
    println!("Words:    {}", entry.word_count());
    if let Some(slot) = entry.template_order() {
        println!("Template: slot {}", slot + 1);
    }
    println!();
    println!("{}", entry.content());
    Ok(())
}
