use anyhow::{ensure, Result};
use chrono::Local;
use std::sync::Arc;

use jot::chat::ConnectionStatus;
use jot::config::JotConfig;

use super::{open_kv, orchestrator, status_hint};

/// Probe the model server once, or keep probing with `watch`.
pub async fn status(config: &JotConfig, watch: bool) -> Result<()> {
    let kv = open_kv(config)?;
    let chat = orchestrator(config, &kv)?;
    println!("Server:  {}", chat.endpoint().base_url());
    println!("Model:   {}", chat.model());

    if !watch {
        let status = chat.check_connection().await;
        println!("Status:  {status} ({})", status_hint(status, chat.model()));
        return Ok(());
    }

    let interval = config.chat.poll_interval();
    ensure!(!interval.is_zero(), "chat.poll_interval_secs must be at least 1");

    let chat = Arc::new(chat);
    let mut rx = chat.subscribe();
    let poller = chat.spawn_status_poller(interval);
    eprintln!("Probing every {}s; Ctrl-C to stop.", interval.as_secs());

    let mut last_shown = None;
    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let status = *rx.borrow_and_update();
                if status == ConnectionStatus::Checking || last_shown == Some(status) {
                    continue;
                }
                println!(
                    "{}  {status} ({})",
                    Local::now().format("%H:%M:%S"),
                    status_hint(status, chat.model())
                );
                last_shown = Some(status);
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    poller.abort();
    Ok(())
}
