use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use jot::chat::{model_available, ChatError, GenerationEndpoint, PullProgress};
use jot::config::JotConfig;
use jot::journal::prefs;

use super::{open_kv, orchestrator, status_hint};

pub fn get(config: &JotConfig) -> Result<()> {
    let kv = open_kv(config)?;
    println!("{}", prefs::selected_model(&kv, &config.chat.default_model)?);
    Ok(())
}

pub fn set(config: &JotConfig, name: &str) -> Result<()> {
    let kv = open_kv(config)?;
    prefs::set_selected_model(&kv, name)?;
    println!("Selected model: {}", name.trim());
    Ok(())
}

/// List installed models, marking the one that satisfies the selection.
pub async fn list(config: &JotConfig) -> Result<()> {
    let kv = open_kv(config)?;
    let chat = orchestrator(config, &kv)?;
    let models = chat
        .endpoint()
        .list_models(config.chat.probe_timeout())
        .await?;

    if models.is_empty() {
        println!("No models installed.");
        return Ok(());
    }
    for name in &models {
        let marker = if model_available(chat.model(), std::slice::from_ref(name)) {
            "*"
        } else {
            " "
        };
        println!("{marker} {name}");
    }
    Ok(())
}

/// Download the selected model with a progress bar, then re-probe.
pub async fn pull(config: &JotConfig) -> Result<()> {
    let kv = open_kv(config)?;
    let chat = orchestrator(config, &kv)?;
    println!("Pulling {} from {}...", chat.model(), chat.endpoint().base_url());

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  {msg:24} {bar:40.cyan/blue} {bytes}/{total_bytes} ({eta})")?
            .progress_chars("##-"),
    );

    let bar = pb.clone();
    let on_progress = move |progress: PullProgress| {
        if let Some(total) = progress.total {
            bar.set_length(total);
            bar.set_position(progress.completed.unwrap_or(0));
        }
        bar.set_message(progress.status);
    };

    let result = chat.pull_model(&on_progress).await;
    pb.finish_and_clear();

    match result {
        Ok(status) => {
            println!("Model pull complete. Status: {status} ({})", status_hint(status, chat.model()));
            Ok(())
        }
        Err(ChatError::NotConnected(status)) => {
            anyhow::bail!("cannot pull while the server is busy ({status})")
        }
        Err(e) => Err(e.into()),
    }
}
