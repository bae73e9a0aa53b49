use anyhow::Result;

use jot::config::JotConfig;

use super::{open_store, orchestrator, require_connection};

/// Answer one question about the journal with the local model.
pub async fn ask(config: &JotConfig, question: &str) -> Result<()> {
    let store = open_store(config)?;
    let kv = store.kv().clone();
    let chat = orchestrator(config, &kv)?;
    require_connection(&chat).await?;

    let answer = chat.ask(question, store.entries()).await?;
    println!("{answer}");
    Ok(())
}
