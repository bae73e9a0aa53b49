//! The entry store: owner of every [`Entry`] record.
//!
//! Entries are kept most-recent-first and persisted as one JSON blob under
//! [`ENTRIES_KEY`]. Every committed mutation writes the blob and bumps a
//! revision counter that views can watch to re-render.

use chrono::{Local, NaiveDate, Utc};
use tokio::sync::watch;

use super::draft::Draft;
use super::stats::{journal_stats, StatsResponse};
use super::templates;
use super::types::Entry;
use crate::db::{KvStore, ENTRIES_KEY};
use crate::error::{JournalError, JournalResult};

/// Result of [`EntryStore::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Created(String),
    Updated(String),
    /// Nothing was persisted.
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    EmptyContent,
    /// Template text staged but not yet edited by the user.
    UneditedTemplate,
}

/// Criteria for [`EntryStore::filter`]. Empty filter matches everything.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    /// Case-insensitive substring of content or title.
    pub text: Option<String>,
    /// Inclusive lower bound on the entry's local calendar date.
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on the entry's local calendar date.
    pub to: Option<NaiveDate>,
    pub templates_only: bool,
}

impl EntryFilter {
    pub fn matches(&self, entry: &Entry) -> bool {
        if self.templates_only && !entry.is_template() {
            return false;
        }
        let day = entry.date().with_timezone(&Local).date_naive();
        if self.from.is_some_and(|from| day < from) {
            return false;
        }
        if self.to.is_some_and(|to| day > to) {
            return false;
        }
        if let Some(ref text) = self.text {
            let needle = text.to_lowercase();
            let in_content = entry.content().to_lowercase().contains(&needle);
            let in_title = entry
                .title()
                .is_some_and(|t| t.to_lowercase().contains(&needle));
            if !in_content && !in_title {
                return false;
            }
        }
        true
    }
}

pub struct EntryStore {
    entries: Vec<Entry>,
    kv: KvStore,
    revision: watch::Sender<u64>,
}

impl EntryStore {
    /// Load the entries blob. A missing blob is an empty journal.
    ///
    /// Template slots that collide or fall out of range are cleared on the
    /// later holder so the uniqueness invariant holds from the first operation.
    pub fn load(kv: KvStore) -> JournalResult<Self> {
        let mut entries: Vec<Entry> = match kv.get(ENTRIES_KEY)? {
            Some(blob) => serde_json::from_str(&blob)?,
            None => Vec::new(),
        };

        let repaired = templates::normalize_slots(&mut entries);
        if repaired > 0 {
            tracing::warn!(repaired, "cleared conflicting template slots on load");
        }
        tracing::debug!(count = entries.len(), "entries loaded");

        let (revision, _) = watch::channel(0);
        let mut store = Self {
            entries,
            kv,
            revision,
        };
        if repaired > 0 {
            store.commit()?;
        }
        Ok(store)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id() == id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|e| e.id() == id)
    }

    pub(crate) fn entries_mut(&mut self) -> &mut Vec<Entry> {
        &mut self.entries
    }

    /// Persist a draft.
    ///
    /// A draft without an id becomes a new entry at the front of the list and is
    /// bound to that id; a bound draft rewrites its entry in place, re-stamping
    /// the date.
    pub fn save(&mut self, draft: &mut Draft) -> JournalResult<SaveOutcome> {
        if draft.content().trim().is_empty() {
            return Ok(SaveOutcome::Skipped(SkipReason::EmptyContent));
        }
        if draft.is_template_origin() {
            return Ok(SaveOutcome::Skipped(SkipReason::UneditedTemplate));
        }

        let outcome = match draft.entry_id() {
            Some(id) => {
                let id = id.to_string();
                let entry = self
                    .get_mut(&id)
                    .ok_or_else(|| JournalError::EntryNotFound(id.clone()))?;
                entry.rewrite(draft.content().to_string(), Utc::now())?;
                SaveOutcome::Updated(id)
            }
            None => {
                let entry = Entry::new(draft.content())?;
                let id = entry.id().to_string();
                self.entries.insert(0, entry);
                draft.bind(id.clone());
                SaveOutcome::Created(id)
            }
        };

        self.commit()?;
        tracing::info!(outcome = ?outcome, "entry saved");
        Ok(outcome)
    }

    pub fn delete(&mut self, id: &str) -> JournalResult<Entry> {
        let index = self
            .entries
            .iter()
            .position(|e| e.id() == id)
            .ok_or_else(|| JournalError::EntryNotFound(id.to_string()))?;
        let removed = self.entries.remove(index);
        self.commit()?;
        tracing::info!(id, was_template = removed.is_template(), "entry deleted");
        Ok(removed)
    }

    /// Set a title. Blank input clears it. The entry date is left alone.
    pub fn set_title(&mut self, id: &str, title: &str) -> JournalResult<()> {
        let trimmed = title.trim();
        let value = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self.get_mut(id)
            .ok_or_else(|| JournalError::EntryNotFound(id.to_string()))?
            .set_title(value);
        self.commit()
    }

    pub fn clear_title(&mut self, id: &str) -> JournalResult<()> {
        self.set_title(id, "")
    }

    pub fn filter(&self, filter: &EntryFilter) -> Vec<&Entry> {
        self.entries.iter().filter(|e| filter.matches(e)).collect()
    }

    /// The key-value handle backing this store.
    pub fn kv(&self) -> &KvStore {
        &self.kv
    }

    pub fn stats(&self) -> StatsResponse {
        journal_stats(&self.entries)
    }

    /// Watch the revision counter; it changes after every committed mutation.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Write the blob and notify watchers.
    pub(crate) fn commit(&mut self) -> JournalResult<()> {
        let blob = serde_json::to_string(&self.entries)?;
        self.kv.set(ENTRIES_KEY, &blob)?;
        self.revision.send_modify(|r| *r += 1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn test_store() -> EntryStore {
        EntryStore::load(KvStore::in_memory().unwrap()).unwrap()
    }

    fn save_text(store: &mut EntryStore, text: &str) -> String {
        let mut draft = Draft::new();
        draft.edit(text);
        match store.save(&mut draft).unwrap() {
            SaveOutcome::Created(id) => id,
            other => panic!("expected Created, got {other:?}"),
        }
    }

    #[test]
    fn save_creates_then_updates_in_place() {
        let mut store = test_store();
        let mut draft = Draft::new();
        draft.edit("first words");

        let id = match store.save(&mut draft).unwrap() {
            SaveOutcome::Created(id) => id,
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(draft.entry_id(), Some(id.as_str()));
        let first_date = store.get(&id).unwrap().date();

        draft.push_str(" and a few more");
        assert_eq!(store.save(&mut draft).unwrap(), SaveOutcome::Updated(id.clone()));
        assert_eq!(store.len(), 1);

        let entry = store.get(&id).unwrap();
        assert_eq!(entry.content(), "first words and a few more");
        assert_eq!(entry.word_count(), 6);
        assert!(entry.date() >= first_date);
    }

    #[test]
    fn empty_content_is_never_persisted() {
        let mut store = test_store();
        let mut draft = Draft::new();
        draft.edit("   ");
        assert_eq!(
            store.save(&mut draft).unwrap(),
            SaveOutcome::Skipped(SkipReason::EmptyContent)
        );
        assert!(store.is_empty());
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn new_entries_go_to_the_front() {
        let mut store = test_store();
        let a = save_text(&mut store, "older");
        let b = save_text(&mut store, "newer");
        let ids: Vec<&str> = store.entries().iter().map(|e| e.id()).collect();
        assert_eq!(ids, vec![b.as_str(), a.as_str()]);
    }

    #[test]
    fn saving_a_deleted_entry_reports_not_found() {
        let mut store = test_store();
        let mut draft = Draft::new();
        draft.edit("soon gone");
        store.save(&mut draft).unwrap();
        let id = draft.entry_id().unwrap().to_string();
        store.delete(&id).unwrap();

        draft.push_str("!");
        let err = store.save(&mut draft).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn delete_unknown_id_is_not_found() {
        let mut store = test_store();
        assert!(matches!(
            store.delete("nope"),
            Err(JournalError::EntryNotFound(_))
        ));
    }

    #[test]
    fn title_survives_content_edits() {
        let mut store = test_store();
        let mut draft = Draft::new();
        draft.edit("draft one");
        store.save(&mut draft).unwrap();
        let id = draft.entry_id().unwrap().to_string();

        store.set_title(&id, "  Morning  ").unwrap();
        draft.edit("draft two");
        store.save(&mut draft).unwrap();
        assert_eq!(store.get(&id).unwrap().title(), Some("Morning"));

        store.clear_title(&id).unwrap();
        assert_eq!(store.get(&id).unwrap().title(), None);
    }

    #[test]
    fn state_persists_across_reload() {
        let kv = KvStore::in_memory().unwrap();
        let mut store = EntryStore::load(kv.clone()).unwrap();
        let id = save_text(&mut store, "kept across restarts");
        store.set_title(&id, "Persisted").unwrap();

        let reloaded = EntryStore::load(kv).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.get(&id).unwrap().title(), Some("Persisted"));
    }

    #[test]
    fn load_repairs_duplicate_slots() {
        let kv = KvStore::in_memory().unwrap();
        kv.set(
            ENTRIES_KEY,
            r#"[
                {"id":"a","content":"one","date":"2024-01-02T00:00:00Z","isTemplate":true,"templateOrder":1},
                {"id":"b","content":"two","date":"2024-01-01T00:00:00Z","isTemplate":true,"templateOrder":1}
            ]"#,
        )
        .unwrap();

        let store = EntryStore::load(kv).unwrap();
        assert_eq!(store.get("a").unwrap().template_order(), Some(1));
        assert!(!store.get("b").unwrap().is_template());
    }

    #[test]
    fn revision_bumps_on_commit() {
        let mut store = test_store();
        let rx = store.subscribe();
        save_text(&mut store, "hello");
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow(), 1);
    }

    #[test]
    fn filter_by_text_and_dates() {
        let mut store = test_store();
        let base = Local.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap().with_timezone(&Utc);
        for (i, text) in ["Hiking in the Alps", "Quiet day at home", "More hiking"]
            .iter()
            .enumerate()
        {
            let entry = Entry::dated(*text, base - Duration::days(i as i64 * 10)).unwrap();
            store.entries_mut().push(entry);
        }

        let hiking = store.filter(&EntryFilter {
            text: Some("HIKING".into()),
            ..Default::default()
        });
        assert_eq!(hiking.len(), 2);

        let june = store.filter(&EntryFilter {
            from: NaiveDate::from_ymd_opt(2024, 6, 1),
            to: NaiveDate::from_ymd_opt(2024, 6, 30),
            ..Default::default()
        });
        assert_eq!(june.len(), 2);

        let templates = store.filter(&EntryFilter {
            templates_only: true,
            ..Default::default()
        });
        assert!(templates.is_empty());
    }
}
