use anyhow::{anyhow, bail, Result};

use jot::config::JotConfig;
use jot::error::JournalError;
use jot::journal::templates::{available_templates, template_count, TemplateSlotAllocator};
use jot::journal::types::{TemplateSource, MAX_TEMPLATES};

use super::open_store;

/// Print the merged template list: custom templates first, then built-ins.
pub fn list(config: &JotConfig) -> Result<()> {
    let store = open_store(config)?;

    for view in available_templates(store.entries()) {
        let origin = match view.source {
            TemplateSource::Custom { order } => format!("custom, slot {}", order + 1),
            TemplateSource::Builtin => "built-in".to_string(),
        };
        println!("{} {:<32} {}  ({origin})", view.icon, view.name, view.id);
    }
    println!();
    println!(
        "Custom slots used: {}/{}",
        template_count(store.entries()),
        MAX_TEMPLATES
    );
    Ok(())
}

pub fn mark(config: &JotConfig, id: &str) -> Result<()> {
    let mut store = open_store(config)?;
    let slot = TemplateSlotAllocator::new(&mut store)
        .mark_as_template(id)
        .map_err(|e| match e {
            JournalError::TemplateCapacity { .. } => {
                anyhow!("{e}; free one with `jot template unmark ID`")
            }
            other => other.into(),
        })?;

    let name = store.get(id).map(|e| e.display_name()).unwrap_or_default();
    println!("\"{name}\" is now template {} of {MAX_TEMPLATES}.", slot + 1);
    Ok(())
}

pub fn unmark(config: &JotConfig, id: &str) -> Result<()> {
    let mut store = open_store(config)?;
    let Some(entry) = store.get(id) else {
        bail!("entry not found: {id}");
    };
    if !entry.is_template() {
        println!("\"{}\" is not a template.", entry.display_name());
        return Ok(());
    }

    TemplateSlotAllocator::new(&mut store).unmark_as_template(id)?;
    println!("Template removed; the entry itself is kept.");
    Ok(())
}
