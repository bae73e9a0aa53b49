//! Fixed instruction templates sent to the model.

use crate::journal::truncate_chars;

/// Characters of an entry sent when asking for a title.
const TITLE_SOURCE_CHARS: usize = 1000;

/// Longest title accepted from the model.
pub const MAX_TITLE_CHARS: usize = 60;

/// Wrap the journal context and the user's question into the chat prompt.
pub fn chat_prompt(context: &str, question: &str) -> String {
    format!(
        "You are a thoughtful, supportive journaling companion. You have access to the \
user's personal journal entries summarized below. Answer the user's question using what \
the entries actually say, mention dates when they help, and never invent events that are \
not in the journal. If the entries do not contain the answer, say so kindly.

JOURNAL CONTEXT:
{context}

USER QUESTION:
{question}

RESPONSE:"
    )
}

/// Ask for a short title for one entry.
pub fn title_prompt(content: &str) -> String {
    format!(
        "Suggest a short title (at most 6 words) for the journal entry below. \
Reply with the title only, without quotes or explanation.

ENTRY:
{}

TITLE:",
        truncate_chars(content, TITLE_SOURCE_CHARS)
    )
}

/// First meaningful line of a model reply, without quotes, markdown or a
/// "Title:" prefix, capped at [`MAX_TITLE_CHARS`].
pub fn clean_title(reply: &str) -> Option<String> {
    let line = reply.lines().map(str::trim).find(|l| !l.is_empty())?;
    let line = line
        .strip_prefix("Title:")
        .or_else(|| line.strip_prefix("title:"))
        .unwrap_or(line);
    let cleaned = line
        .trim()
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '*' | '#' | '`'))
        .trim();
    if cleaned.is_empty() {
        return None;
    }
    Some(cleaned.chars().take(MAX_TITLE_CHARS).collect())
}
