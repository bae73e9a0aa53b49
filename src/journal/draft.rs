//! Unsaved input and debounced autosave.
//!
//! A [`Draft`] is the text the user is currently writing. The [`Autosaver`]
//! persists it a fixed delay after the last edit: each edit replaces the
//! pending save task with a fresh one, so a burst of edits produces a single
//! write of the final text.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use super::store::{EntryStore, SaveOutcome};
use super::types::Entry;
use crate::error::JournalResult;

/// Pending, not-yet-persisted input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    entry_id: Option<String>,
    content: String,
    from_template: bool,
}

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue editing an existing entry.
    pub fn for_entry(entry: &Entry) -> Self {
        Self {
            entry_id: Some(entry.id().to_string()),
            content: entry.content().to_string(),
            from_template: false,
        }
    }

    /// Staged template text; stays template-origin until the first edit.
    pub(crate) fn from_template(content: impl Into<String>) -> Self {
        Self {
            entry_id: None,
            content: content.into(),
            from_template: true,
        }
    }

    pub fn entry_id(&self) -> Option<&str> {
        self.entry_id.as_deref()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_template_origin(&self) -> bool {
        self.from_template
    }

    /// Replace the whole text. Any edit turns template text into ordinary input.
    pub fn edit(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.from_template = false;
    }

    pub fn push_str(&mut self, text: &str) {
        self.content.push_str(text);
        self.from_template = false;
    }

    pub(crate) fn bind(&mut self, id: String) {
        self.entry_id = Some(id);
    }
}

/// Debounced writer for one draft.
///
/// The store sits behind a mutex: it is the single writer lock for entry
/// content and template slots once saves run on background tasks.
pub struct Autosaver {
    store: Arc<Mutex<EntryStore>>,
    draft: Arc<Mutex<Draft>>,
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Autosaver {
    pub fn new(store: Arc<Mutex<EntryStore>>, draft: Draft, delay: Duration) -> Self {
        Self {
            store,
            draft: Arc::new(Mutex::new(draft)),
            delay,
            pending: None,
        }
    }

    /// Apply an edit and restart the debounce window.
    pub async fn update(&mut self, edit: impl FnOnce(&mut Draft)) {
        {
            let mut draft = self.draft.lock().await;
            edit(&mut draft);
        }
        self.schedule();
    }

    /// Replace any pending save with a fresh one `delay` from now.
    pub fn schedule(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }

        let store = Arc::clone(&self.store);
        let draft = Arc::clone(&self.draft);
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut draft = draft.lock().await;
            let mut store = store.lock().await;
            match store.save(&mut draft) {
                Ok(outcome) => tracing::debug!(?outcome, "autosave fired"),
                Err(e) => tracing::warn!(error = %e, "autosave failed"),
            }
        }));
    }

    /// Cancel the pending save and persist the current text now.
    pub async fn flush(&mut self) -> JournalResult<SaveOutcome> {
        if let Some(handle) = self.pending.take() {
            handle.abort();
            // Let an in-progress save release its locks before saving again.
            let _ = handle.await;
        }
        let mut draft = self.draft.lock().await;
        let mut store = self.store.lock().await;
        store.save(&mut draft)
    }

    /// Snapshot of the current draft.
    pub async fn draft(&self) -> Draft {
        self.draft.lock().await.clone()
    }
}

impl Drop for Autosaver {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
