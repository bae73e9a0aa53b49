//! Core journal type definitions.
//!
//! Defines [`Entry`] (one persisted writing session), [`BuiltinTemplate`]
//! (fixed starter texts), and [`TemplateView`] (one row of the merged template
//! list shown to the user).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{truncate_chars, word_count};
use crate::error::{JournalError, JournalResult};

/// Maximum number of entries that may be flagged as templates at once.
pub const MAX_TEMPLATES: usize = 5;

/// Characters of content used as a template's display name when it has no title.
pub const TEMPLATE_NAME_CHARS: usize = 30;

/// One journal writing session.
///
/// Fields are private: content, date and title change only through the entry
/// store, and the template slot only through the template allocator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EntryRecord", into = "EntryRecord")]
pub struct Entry {
    id: String,
    content: String,
    date: DateTime<Utc>,
    word_count: usize,
    title: Option<String>,
    is_template: bool,
    template_order: Option<usize>,
}

impl Entry {
    /// Create a fresh entry stamped now, with a new UUID v7 id.
    pub fn new(content: impl Into<String>) -> JournalResult<Self> {
        Self::dated(content, Utc::now())
    }

    /// Create a fresh entry with an explicit date.
    pub fn dated(content: impl Into<String>, date: DateTime<Utc>) -> JournalResult<Self> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(JournalError::EmptyContent);
        }
        Ok(Self {
            id: uuid::Uuid::now_v7().to_string(),
            word_count: word_count(&content),
            content,
            date,
            title: None,
            is_template: false,
            template_order: None,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn is_template(&self) -> bool {
        self.is_template
    }

    pub fn template_order(&self) -> Option<usize> {
        self.template_order
    }

    /// Title if present, else the first 30 characters of content.
    pub fn display_name(&self) -> String {
        match &self.title {
            Some(t) => t.clone(),
            None => truncate_chars(self.content.trim(), TEMPLATE_NAME_CHARS),
        }
    }

    /// Replace content, recompute the word count and re-stamp the date.
    pub(crate) fn rewrite(&mut self, content: String, now: DateTime<Utc>) -> JournalResult<()> {
        if content.trim().is_empty() {
            return Err(JournalError::EmptyContent);
        }
        self.word_count = word_count(&content);
        self.content = content;
        self.date = now;
        Ok(())
    }

    pub(crate) fn set_title(&mut self, title: Option<String>) {
        self.title = title;
    }

    /// Only `journal::templates` calls this; it owns slot uniqueness.
    pub(super) fn set_template_slot(&mut self, slot: Option<usize>) {
        self.is_template = slot.is_some();
        self.template_order = slot;
    }
}

/// On-disk shape of an [`Entry`]. Optional fields default for records written
/// by older versions.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntryRecord {
    id: String,
    content: String,
    date: DateTime<Utc>,
    #[serde(default)]
    word_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(default)]
    is_template: bool,
    #[serde(default)]
    template_order: Option<usize>,
}

impl TryFrom<EntryRecord> for Entry {
    type Error = JournalError;

    fn try_from(record: EntryRecord) -> Result<Self, Self::Error> {
        if record.id.trim().is_empty() {
            return Err(JournalError::InvalidEntry("missing id".into()));
        }
        if record.content.trim().is_empty() {
            return Err(JournalError::InvalidEntry(format!(
                "entry {} has empty content",
                record.id
            )));
        }

        let template_order = match (record.is_template, record.template_order) {
            (true, Some(order)) if order < MAX_TEMPLATES => Some(order),
            (true, other) => {
                tracing::warn!(id = %record.id, order = ?other, "dropping invalid template slot");
                None
            }
            (false, _) => None,
        };

        Ok(Entry {
            word_count: record
                .word_count
                .unwrap_or_else(|| word_count(&record.content)),
            id: record.id,
            content: record.content,
            date: record.date,
            title: record.title.filter(|t| !t.trim().is_empty()),
            is_template: template_order.is_some(),
            template_order,
        })
    }
}

impl From<Entry> for EntryRecord {
    fn from(entry: Entry) -> Self {
        EntryRecord {
            id: entry.id,
            content: entry.content,
            date: entry.date,
            word_count: Some(entry.word_count),
            title: entry.title,
            is_template: entry.is_template,
            template_order: entry.template_order,
        }
    }
}

/// A fixed starter text shipped with the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub content: &'static str,
}

/// Built-in templates, in display order.
pub const BUILTIN_TEMPLATES: [BuiltinTemplate; 2] = [
    BuiltinTemplate {
        id: "daily-reflection",
        name: "Daily Reflection",
        icon: "🌅",
        content: "Today I'm grateful for:\n\n\
                  What went well today:\n\n\
                  What I learned:\n\n\
                  What I'd like to improve tomorrow:\n",
    },
    BuiltinTemplate {
        id: "weekly-review",
        name: "Weekly Review",
        icon: "📅",
        content: "Highlights of this week:\n\n\
                  Challenges I faced:\n\n\
                  Progress on my goals:\n\n\
                  Focus for next week:\n",
    },
];

/// Where a row of the template list comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum TemplateSource {
    /// A user entry holding the given slot.
    Custom { order: usize },
    Builtin,
}

/// One row of the merged, capacity-bounded template list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateView {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub source: TemplateSource,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn new_entry_rejects_blank_content() {
        assert!(matches!(Entry::new("   \n"), Err(JournalError::EmptyContent)));
    }

    #[test]
    fn new_entry_counts_words() {
        let entry = Entry::new("one two  three").unwrap();
        assert_eq!(entry.word_count(), 3);
        assert!(!entry.is_template());
        assert_eq!(entry.template_order(), None);
        assert!(!entry.id().is_empty());
    }

    #[test]
    fn serde_roundtrip_preserves_fields() {
        let date = Utc.with_ymd_and_hms(2024, 3, 9, 8, 30, 0).unwrap();
        let mut entry = Entry::dated("Walked by the river", date).unwrap();
        entry.set_title(Some("River".into()));
        entry.set_template_slot(Some(2));

        let json = serde_json::to_string(&entry).unwrap();
        let back: Entry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn legacy_record_defaults_template_fields() {
        let json = r#"{"id":"abc","content":"old note here","date":"2023-05-01T10:00:00.000Z","wordCount":3}"#;
        let entry: Entry = serde_json::from_str(json).unwrap();
        assert!(!entry.is_template());
        assert_eq!(entry.template_order(), None);
        assert_eq!(entry.title(), None);
        assert_eq!(entry.word_count(), 3);
    }

    #[test]
    fn serialized_shape_uses_camel_case() {
        let entry = Entry::new("hello").unwrap();
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["isTemplate"], false);
        assert!(value["templateOrder"].is_null());
        assert_eq!(value["wordCount"], 1);
        assert!(value.get("title").is_none());
    }

    #[test]
    fn rejects_empty_content_record() {
        let json = r#"{"id":"abc","content":"  ","date":"2023-05-01T10:00:00Z"}"#;
        assert!(serde_json::from_str::<Entry>(json).is_err());
    }

    #[test]
    fn out_of_range_slot_is_dropped() {
        let json = r#"{"id":"abc","content":"x","date":"2023-05-01T10:00:00Z","isTemplate":true,"templateOrder":7}"#;
        let entry: Entry = serde_json::from_str(json).unwrap();
        assert!(!entry.is_template());
        assert_eq!(entry.template_order(), None);
    }

    #[test]
    fn missing_word_count_is_recomputed() {
        let json = r#"{"id":"abc","content":"a b c d","date":"2023-05-01T10:00:00Z"}"#;
        let entry: Entry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.word_count(), 4);
    }

    #[test]
    fn display_name_prefers_title() {
        let mut entry =
            Entry::new("This is a rather long opening line for an entry").unwrap();
        assert_eq!(entry.display_name(), "This is a rather long opening ...");
        entry.set_title(Some("Morning pages".into()));
        assert_eq!(entry.display_name(), "Morning pages");
    }
}
