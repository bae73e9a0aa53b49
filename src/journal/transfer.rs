//! JSON export and import of the whole journal.
//!
//! Import is all-or-nothing: the document is fully parsed and validated before
//! the store is touched. Entries whose id already exists are skipped, never
//! overwritten.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::store::EntryStore;
use super::templates::{self, ReseatReport};
use super::types::Entry;
use crate::error::{JournalError, JournalResult};

pub const EXPORT_VERSION: &str = "1.0";

/// Export format.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub version: String,
    pub export_date: DateTime<Utc>,
    pub entries: Vec<Entry>,
}

/// Counts reported after an import.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
    pub templates_reseated: usize,
    pub templates_demoted: usize,
}

pub fn export_document(store: &EntryStore) -> ExportDocument {
    ExportDocument {
        version: EXPORT_VERSION.to_string(),
        export_date: Utc::now(),
        entries: store.entries().to_vec(),
    }
}

pub fn export_json(store: &EntryStore) -> JournalResult<String> {
    Ok(serde_json::to_string_pretty(&export_document(store))?)
}

/// Parse and validate an export document without side effects.
pub fn parse_document(json: &str) -> JournalResult<ExportDocument> {
    let doc: ExportDocument =
        serde_json::from_str(json).map_err(|e| JournalError::MalformedImport(e.to_string()))?;
    if doc.version != EXPORT_VERSION {
        tracing::warn!(version = %doc.version, expected = EXPORT_VERSION, "importing unknown export version");
    }
    Ok(doc)
}

/// Merge new entries from `json` into the store, re-sort newest first and
/// persist once. If the write fails the in-memory entries are restored.
///
/// Imported entries that were templates get a fresh slot through the
/// allocator when one is free; otherwise they arrive as ordinary entries.
pub fn import_json(store: &mut EntryStore, json: &str) -> JournalResult<ImportReport> {
    let doc = parse_document(json)?;

    let mut known: HashSet<String> = store.entries().iter().map(|e| e.id().to_string()).collect();
    let mut fresh = Vec::new();
    let mut claims = Vec::new();
    let mut skipped = 0;

    for mut entry in doc.entries {
        if !known.insert(entry.id().to_string()) {
            skipped += 1;
            continue;
        }
        if let Some(order) = templates::take_slot_claim(&mut entry) {
            claims.push((entry.id().to_string(), order));
        }
        fresh.push(entry);
    }

    let imported = fresh.len();
    let mut reseat = ReseatReport::default();
    if imported > 0 {
        let previous = store.entries().to_vec();
        let merged = {
            let entries = store.entries_mut();
            entries.extend(fresh);
            templates::reseat_claims(entries, claims).map(|report| {
                entries.sort_by(|a, b| b.date().cmp(&a.date()));
                report
            })
        }
        .and_then(|report| store.commit().map(|()| report));
        match merged {
            Ok(report) => reseat = report,
            Err(e) => {
                *store.entries_mut() = previous;
                return Err(e);
            }
        }
    }

    let report = ImportReport {
        imported,
        skipped,
        templates_reseated: reseat.reseated,
        templates_demoted: reseat.demoted,
    };
    tracing::info!(?report, "import complete");
    Ok(report)
}
