#![allow(dead_code)]

use chrono::{DateTime, Local, TimeZone, Utc};
use jot::db::KvStore;
use jot::journal::draft::Draft;
use jot::journal::store::{EntryStore, SaveOutcome};
use jot::journal::types::Entry;

/// Open a fresh in-memory store with schema and migrations applied.
pub fn test_store() -> EntryStore {
    EntryStore::load(KvStore::in_memory().unwrap()).unwrap()
}

/// Save `text` as a new entry through the normal draft path. Returns its id.
pub fn save_text(store: &mut EntryStore, text: &str) -> String {
    let mut draft = Draft::new();
    draft.edit(text);
    match store.save(&mut draft).unwrap() {
        SaveOutcome::Created(id) => id,
        other => panic!("expected a new entry, got {other:?}"),
    }
}

/// A store holding `n` entries, returned with their ids in creation order.
pub fn store_with_entries(n: usize) -> (EntryStore, Vec<String>) {
    let mut store = test_store();
    let ids = (0..n)
        .map(|i| save_text(&mut store, &format!("journal entry number {i}")))
        .collect();
    (store, ids)
}

/// Local noon on the given day, stored as UTC, so month grouping and date
/// labels see that calendar day in every timezone.
pub fn noon(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Local.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap().with_timezone(&Utc)
}

pub fn dated(content: &str, year: i32, month: u32, day: u32) -> Entry {
    Entry::dated(content, noon(year, month, day)).unwrap()
}
