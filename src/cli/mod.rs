pub mod ask;
pub mod context;
pub mod delete;
pub mod doctor;
pub mod export;
pub mod import;
pub mod list;
pub mod model;
pub mod show;
pub mod stats;
pub mod status;
pub mod template;
pub mod theme;
pub mod title;
pub mod write;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local, Utc};

use jot::chat::ollama::OllamaEndpoint;
use jot::chat::orchestrator::ChatTimeouts;
use jot::chat::{ChatOrchestrator, ConnectionStatus};
use jot::config::JotConfig;
use jot::db::KvStore;
use jot::journal::prefs;
use jot::journal::store::EntryStore;

/// Open the configured database as a key-value handle.
pub fn open_kv(config: &JotConfig) -> Result<KvStore> {
    let db_path = config.resolved_db_path();
    KvStore::open(&db_path)
        .with_context(|| format!("failed to open journal at {}", db_path.display()))
}

/// Open the database and load every entry.
pub fn open_store(config: &JotConfig) -> Result<EntryStore> {
    let kv = open_kv(config)?;
    EntryStore::load(kv).context("failed to load journal entries")
}

/// Orchestrator for the selected model on the configured server.
pub fn orchestrator(config: &JotConfig, kv: &KvStore) -> Result<ChatOrchestrator<OllamaEndpoint>> {
    let model = prefs::selected_model(kv, &config.chat.default_model)?;
    Ok(ChatOrchestrator::new(
        OllamaEndpoint::new(&config.chat.base_url),
        model,
        ChatTimeouts::from(&config.chat),
        config.context.limits(),
    ))
}

/// Probe once and fail with a single actionable notice unless connected.
pub async fn require_connection(chat: &ChatOrchestrator<OllamaEndpoint>) -> Result<()> {
    let status = chat.check_connection().await;
    if status != ConnectionStatus::Connected {
        bail!(
            "AI chat is unavailable ({status}): {}",
            status_hint(status, chat.model())
        );
    }
    Ok(())
}

/// What the user can do about a status.
pub fn status_hint(status: ConnectionStatus, model: &str) -> String {
    match status {
        ConnectionStatus::Connected => format!("ready to chat with {model}"),
        ConnectionStatus::Checking => "a connection check is in progress".into(),
        ConnectionStatus::Downloading => format!("{model} is downloading"),
        ConnectionStatus::ModelMissing => {
            format!("{model} is not installed; run `jot model pull`")
        }
        ConnectionStatus::Timeout => "the model server did not answer in time".into(),
        ConnectionStatus::NotInstalled => {
            "no model server is listening; install and start Ollama".into()
        }
        ConnectionStatus::Disconnected => "the model server returned an error".into(),
    }
}

/// Local date and time for listings.
pub fn format_date(date: DateTime<Utc>) -> String {
    date.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}
