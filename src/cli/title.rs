use anyhow::{bail, Result};

use jot::config::JotConfig;

use super::{open_store, orchestrator, require_connection};

pub fn set(config: &JotConfig, id: &str, title: &str) -> Result<()> {
    let mut store = open_store(config)?;
    store.set_title(id, title)?;
    match store.get(id).and_then(|e| e.title()) {
        Some(title) => println!("Title set to \"{title}\"."),
        None => println!("Title cleared."),
    }
    Ok(())
}

pub fn clear(config: &JotConfig, id: &str) -> Result<()> {
    let mut store = open_store(config)?;
    store.clear_title(id)?;
    println!("Title cleared.");
    Ok(())
}

/// Ask the local model for a title; store it when `apply` is set.
pub async fn suggest(config: &JotConfig, id: &str, apply: bool) -> Result<()> {
    let mut store = open_store(config)?;
    let Some(content) = store.get(id).map(|e| e.content().to_string()) else {
        bail!("entry not found: {id}");
    };

    let chat = orchestrator(config, store.kv())?;
    require_connection(&chat).await?;
    let title = chat.suggest_title(&content).await?;
    println!("{title}");

    if apply {
        store.set_title(id, &title)?;
        eprintln!("Title saved.");
    }
    Ok(())
}
