pub mod context;
pub mod draft;
pub mod prefs;
pub mod stats;
pub mod store;
pub mod templates;
pub mod transfer;
pub mod types;

/// Whitespace-delimited token count.
pub fn word_count(content: &str) -> usize {
    content.split_whitespace().count()
}

/// Truncate content to `max_chars` characters, appending "..." if truncated.
pub fn truncate_chars(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        None => content.to_string(),
        Some((end, _)) => format!("{}...", &content[..end]),
    }
}
