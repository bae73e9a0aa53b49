use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;

use super::context::month_label;
use super::templates::template_count;
use super::types::Entry;

/// Response from [`journal_stats`].
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_entries: usize,
    pub total_words: usize,
    pub average_words: f64,
    pub templates: usize,
    pub titled: usize,
    pub months: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oldest_entry: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newest_entry: Option<DateTime<Utc>>,
}

/// Compute journal statistics.
pub fn journal_stats(entries: &[Entry]) -> StatsResponse {
    let total_words: usize = entries.iter().map(Entry::word_count).sum();
    let months: HashSet<String> = entries.iter().map(month_label).collect();

    StatsResponse {
        total_entries: entries.len(),
        total_words,
        average_words: if entries.is_empty() {
            0.0
        } else {
            total_words as f64 / entries.len() as f64
        },
        templates: template_count(entries),
        titled: entries.iter().filter(|e| e.title().is_some()).count(),
        months: months.len(),
        oldest_entry: entries.iter().map(Entry::date).min(),
        newest_entry: entries.iter().map(Entry::date).max(),
    }
}
