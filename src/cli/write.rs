use anyhow::{Context, Result};
use std::io::IsTerminal;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;

use jot::config::JotConfig;
use jot::error::JournalError;
use jot::journal::draft::{Autosaver, Draft};
use jot::journal::store::{SaveOutcome, SkipReason};
use jot::journal::templates;

use super::open_store;

/// Write an entry from TEXT or from stdin, autosaving as lines arrive.
///
/// With `template`, the template text is staged first and only persisted once
/// something is added to it. With `entry`, new text is appended to that entry.
pub async fn write(
    config: &JotConfig,
    text: Option<String>,
    template: Option<&str>,
    entry: Option<&str>,
) -> Result<()> {
    let store = open_store(config)?;
    let draft = match (template, entry) {
        (Some(id), _) => templates::create_entry_from_template(store.entries(), id)?,
        (None, Some(id)) => {
            let existing = store
                .get(id)
                .ok_or_else(|| JournalError::EntryNotFound(id.to_string()))?;
            Draft::for_entry(existing)
        }
        (None, None) => Draft::new(),
    };

    let store = Arc::new(Mutex::new(store));
    let mut autosaver = Autosaver::new(store, draft, config.autosave.debounce());

    match text {
        Some(text) => autosaver.update(|d| append_block(d, &text)).await,
        None => read_stdin(&mut autosaver).await?,
    }

    match autosaver.flush().await? {
        SaveOutcome::Created(id) => println!("Saved new entry {id}."),
        SaveOutcome::Updated(id) => println!("Updated entry {id}."),
        SaveOutcome::Skipped(SkipReason::EmptyContent) => {
            eprintln!("Nothing saved: the entry is empty.")
        }
        SaveOutcome::Skipped(SkipReason::UneditedTemplate) => {
            eprintln!("Nothing saved: the template was not edited.")
        }
    }
    Ok(())
}

async fn read_stdin(autosaver: &mut Autosaver) -> Result<()> {
    if std::io::stdin().is_terminal() {
        let draft = autosaver.draft().await;
        if !draft.content().is_empty() {
            println!("{}", draft.content());
        }
        eprintln!("Saved as you type. Ctrl-D to finish.");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        autosaver.update(|d| d.push_str(&format!("{line}\n"))).await;
    }
    Ok(())
}

/// Append `text` as its own paragraph line.
fn append_block(draft: &mut Draft, text: &str) {
    if draft.content().is_empty() {
        draft.edit(text);
    } else if draft.content().ends_with('\n') {
        draft.push_str(text);
    } else {
        draft.push_str(&format!("\n{text}"));
    }
}
