//! Context construction for the chat model.
//!
//! Given a question and the full entry list, entries are split into three
//! tiers: entries sharing a significant word with the question (shown in full,
//! up to `relevant_chars`), the first `recent_limit` of the rest (shown
//! shorter), and everything older (never shown individually, only counted per
//! calendar month with a few theme words). Every entry lands in exactly one
//! tier, so the per-tier counts always add up to the total.

use chrono::Local;
use std::collections::HashMap;

use super::truncate_chars;
use super::types::Entry;

/// Text returned when there is nothing to summarize.
pub const EMPTY_CONTEXT: &str = "The user has no journal entries yet.";

/// Function words ignored when matching a question against entries.
const QUERY_STOP_WORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "any", "can", "had", "her", "was",
    "one", "our", "out", "has", "have", "what", "when", "where", "which", "who", "why", "how",
    "did", "does", "about", "with", "this", "that", "from", "they", "were", "been", "into",
];

/// Broader list ignored when picking theme words for a month.
const THEME_STOP_WORDS: &[&str] = &[
    "that", "this", "with", "from", "have", "were", "been", "they", "them", "their", "there",
    "then", "than", "what", "when", "where", "which", "while", "would", "could", "should",
    "about", "after", "before", "just", "like", "into", "over", "some", "more", "most", "much",
    "very", "also", "really", "today", "still", "even", "only", "your", "will", "because",
    "being", "going", "through", "things", "thing", "feel", "felt",
];

/// Size knobs for [`ContextPlan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextLimits {
    /// Characters kept from each relevant entry.
    pub relevant_chars: usize,
    /// Characters kept from each recent entry.
    pub recent_chars: usize,
    /// How many non-relevant entries are shown individually.
    pub recent_limit: usize,
    /// Theme words listed per month.
    pub theme_words: usize,
}

impl Default for ContextLimits {
    fn default() -> Self {
        Self {
            relevant_chars: 500,
            recent_chars: 300,
            recent_limit: 15,
            theme_words: 3,
        }
    }
}

/// Lower-case, drop everything but letters, digits, `_` and whitespace.
fn strip_punctuation(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Significant words of a question: longer than two characters and not a
/// function word.
pub fn query_terms(query: &str) -> Vec<String> {
    strip_punctuation(query)
        .split_whitespace()
        .filter(|w| w.chars().count() > 2 && !QUERY_STOP_WORDS.contains(w))
        .map(str::to_string)
        .collect()
}

/// True iff any significant word of `query` occurs as a substring of the
/// lower-cased entry content.
pub fn is_entry_relevant(query: &str, content: &str) -> bool {
    let haystack = content.to_lowercase();
    query_terms(query).iter().any(|term| haystack.contains(term.as_str()))
}

/// Up to `limit` most frequent words across the entries' content.
///
/// Words shorter than four characters and common filler words are skipped.
/// Equal counts keep the order in which the words were first seen (the sort
/// is stable over first-occurrence order), never alphabetical order.
pub fn extract_theme_words(entries: &[&Entry], limit: usize) -> Vec<String> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for entry in entries {
        let cleaned = strip_punctuation(entry.content());
        for word in cleaned.split_whitespace() {
            if word.chars().count() <= 3 || THEME_STOP_WORDS.contains(&word) {
                continue;
            }
            match index.get(word) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    index.insert(word.to_string(), counts.len());
                    counts.push((word.to_string(), 1));
                }
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().take(limit).map(|(w, _)| w).collect()
}

/// "Month Year" label of an entry's local date, e.g. "March 2024".
pub fn month_label(entry: &Entry) -> String {
    entry.date().with_timezone(&Local).format("%B %Y").to_string()
}

/// Group entries by "Month Year", months in order of first appearance.
pub fn group_by_month<'a>(entries: &[&'a Entry]) -> Vec<(String, Vec<&'a Entry>)> {
    let mut groups: Vec<(String, Vec<&'a Entry>)> = Vec::new();
    for &entry in entries {
        let label = month_label(entry);
        match groups.iter_mut().find(|(m, _)| *m == label) {
            Some((_, members)) => members.push(entry),
            None => groups.push((label, vec![entry])),
        }
    }
    groups
}

/// One month of older entries, reduced to a count and theme words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthSummary {
    pub month: String,
    pub count: usize,
    pub themes: Vec<String>,
}

/// Tiered view of the journal for one question.
#[derive(Debug)]
pub struct ContextPlan<'a> {
    pub total: usize,
    pub relevant: Vec<&'a Entry>,
    pub recent: Vec<&'a Entry>,
    pub older: Vec<MonthSummary>,
    limits: ContextLimits,
}

impl<'a> ContextPlan<'a> {
    /// Partition `entries` (expected most-recent-first) for `query`.
    pub fn new(query: &str, entries: &'a [Entry], limits: ContextLimits) -> Self {
        let (relevant, other): (Vec<&Entry>, Vec<&Entry>) = entries
            .iter()
            .partition(|e| is_entry_relevant(query, e.content()));

        let split = other.len().min(limits.recent_limit);
        let recent = other[..split].to_vec();
        let older = group_by_month(&other[split..])
            .into_iter()
            .map(|(month, members)| MonthSummary {
                count: members.len(),
                themes: extract_theme_words(&members, limits.theme_words),
                month,
            })
            .collect();

        Self {
            total: entries.len(),
            relevant,
            recent,
            older,
            limits,
        }
    }

    /// Entries accounted for across all three tiers; always equals `total`.
    pub fn accounted(&self) -> usize {
        self.relevant.len() + self.recent.len() + self.older.iter().map(|m| m.count).sum::<usize>()
    }

    pub fn render(&self) -> String {
        if self.total == 0 {
            return EMPTY_CONTEXT.to_string();
        }

        let mut out = format!(
            "The user has written {} journal {}.\n",
            self.total,
            plural(self.total, "entry", "entries")
        );

        if !self.relevant.is_empty() {
            out.push_str("\nMOST RELEVANT ENTRIES:\n");
            for entry in &self.relevant {
                push_entry(&mut out, entry, self.limits.relevant_chars);
            }
        }

        if !self.recent.is_empty() {
            out.push_str("\nRECENT ENTRIES:\n");
            for entry in &self.recent {
                push_entry(&mut out, entry, self.limits.recent_chars);
            }
        }

        if !self.older.is_empty() {
            out.push_str("\nOLDER ENTRIES (summarized by month):\n");
            for month in &self.older {
                out.push_str(&format!(
                    "- {}: {} {}",
                    month.month,
                    month.count,
                    plural(month.count, "entry", "entries")
                ));
                if !month.themes.is_empty() {
                    out.push_str(&format!(" (themes: {})", month.themes.join(", ")));
                }
                out.push('\n');
            }
        }

        out
    }
}

fn push_entry(out: &mut String, entry: &Entry, max_chars: usize) {
    let date = entry.date().with_timezone(&Local).format("%B %-d, %Y");
    out.push_str(&format!(
        "[{}] {}\n",
        date,
        truncate_chars(entry.content(), max_chars)
    ));
}

fn plural<'s>(n: usize, one: &'s str, many: &'s str) -> &'s str {
    if n == 1 {
        one
    } else {
        many
    }
}

/// Render the context for `query` with default limits.
pub fn build_context(query: &str, entries: &[Entry]) -> String {
    ContextPlan::new(query, entries, ContextLimits::default()).render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn entry_on(content: &str, year: i32, month: u32, day: u32) -> Entry {
        let noon = Local.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap();
        Entry::dated(content, noon.with_timezone(&Utc)).unwrap()
    }

    #[test]
    fn relevance_matches_significant_words() {
        assert!(is_entry_relevant(
            "machine learning",
            "today i worked on machine learning algorithms"
        ));
        assert!(!is_entry_relevant(
            "machine learning",
            "went to the store and bought groceries"
        ));
    }

    #[test]
    fn relevance_ignores_short_and_stop_words() {
        assert_eq!(query_terms("What did I do at the gym?"), vec!["gym".to_string()]);
        assert!(!is_entry_relevant("what is it", "what a day it is"));
    }

    #[test]
    fn relevance_strips_query_punctuation_and_case() {
        assert!(is_entry_relevant("Running?!", "Went RUNNING along the canal"));
    }

    #[test]
    fn empty_journal_renders_fixed_message() {
        assert_eq!(build_context("anything", &[]), EMPTY_CONTEXT);
    }

    #[test]
    fn theme_words_count_frequency_with_first_seen_ties() {
        let a = entry_on("Garden work, garden planning. Coffee!", 2024, 1, 10);
        let b = entry_on("Coffee with Sam, then reading", 2024, 1, 11);
        let themes = extract_theme_words(&[&a, &b], 3);
        // garden 2, coffee 2 (garden seen first), then work (first of the singles)
        assert_eq!(themes, vec!["garden", "coffee", "work"]);
    }

    #[test]
    fn theme_words_skip_short_and_filler() {
        let a = entry_on("the cat sat; really really really tired", 2024, 1, 10);
        assert_eq!(extract_theme_words(&[&a], 3), vec!["tired"]);
    }

    #[test]
    fn months_grouped_in_first_seen_order() {
        let a = entry_on("a", 2024, 3, 15);
        let b = entry_on("b", 2024, 1, 15);
        let c = entry_on("c", 2024, 3, 16);
        let groups = group_by_month(&[&a, &b, &c]);
        let labels: Vec<&str> = groups.iter().map(|(m, _)| m.as_str()).collect();
        assert_eq!(labels, vec!["March 2024", "January 2024"]);
        assert_eq!(groups[0].1.len(), 2);
    }

    #[test]
    fn twenty_unmatched_entries_split_fifteen_and_five() {
        let mut entries = Vec::new();
        for i in 0..20u32 {
            let month = 3 - i / 7; // March, February, January
            entries.push(entry_on(&format!("Ordinary day number {i}"), 2024, month, 20 - i % 7));
        }

        let plan = ContextPlan::new("vacation", &entries, ContextLimits::default());
        assert!(plan.relevant.is_empty());
        assert_eq!(plan.recent.len(), 15);
        assert!(!plan.older.is_empty());
        assert_eq!(plan.older.iter().map(|m| m.count).sum::<usize>(), 5);
        assert_eq!(plan.accounted(), 20);
    }

    #[test]
    fn accounting_is_lossless_for_mixed_input() {
        let mut entries = Vec::new();
        for i in 0..40u32 {
            let text = if i % 4 == 0 {
                format!("Long hike in the hills, day {i}")
            } else {
                format!("Office work and errands {i}")
            };
            entries.push(entry_on(&text, 2023, 1 + i % 12, 5));
        }
        for query in ["hike", "office", "nothing matches", ""] {
            let plan = ContextPlan::new(query, &entries, ContextLimits::default());
            assert_eq!(plan.accounted(), entries.len(), "query {query:?}");
        }
    }

    #[test]
    fn render_orders_tiers_and_truncates() {
        let long = "x".repeat(600);
        let entries = vec![
            entry_on("Planning the garden beds", 2024, 5, 20),
            entry_on(&long, 2024, 5, 19),
            entry_on("garden tomatoes finally", 2024, 5, 18),
        ];
        let text = ContextPlan::new("garden", &entries, ContextLimits::default()).render();

        assert!(text.starts_with("The user has written 3 journal entries."));
        let relevant_at = text.find("MOST RELEVANT ENTRIES:").unwrap();
        let recent_at = text.find("RECENT ENTRIES:\n[").unwrap();
        assert!(relevant_at < recent_at);
        assert!(text.contains("[May 20, 2024] Planning the garden beds"));
        assert!(text.contains(&format!("{}...", "x".repeat(300))));
        assert!(!text.contains(&"x".repeat(301)));
        assert!(!text.contains("OLDER ENTRIES"));
    }

    #[test]
    fn older_entries_are_summarized_not_listed() {
        let mut entries = Vec::new();
        for i in 0..3 {
            entries.push(entry_on(&format!("recent note {i}"), 2024, 6, 10 + i));
        }
        entries.push(entry_on("Sailing sailing harbour", 2024, 2, 3));
        let limits = ContextLimits {
            recent_limit: 3,
            ..ContextLimits::default()
        };
        let text = ContextPlan::new("zzz", &entries, limits).render();
        assert!(text.contains("- February 2024: 1 entry (themes: sailing, harbour)"));
        assert!(!text.contains("Sailing sailing"));
    }
}
