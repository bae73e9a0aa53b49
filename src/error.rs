//! Error types for journal operations.

use thiserror::Error;

/// Result alias for journal operations.
pub type JournalResult<T> = Result<T, JournalError>;

/// Recoverable failures raised by the entry store, the template allocator and
/// import. Not-found and capacity failures never mutate state.
#[derive(Error, Debug)]
pub enum JournalError {
    #[error("entry not found: {0}")]
    EntryNotFound(String),

    #[error("template not found: {0}")]
    TemplateNotFound(String),

    #[error("template slots are full ({max} maximum)")]
    TemplateCapacity { max: usize },

    #[error("entry content is empty")]
    EmptyContent,

    #[error("template slot invariant violated: {0}")]
    SlotInvariant(String),

    #[error("invalid entry: {0}")]
    InvalidEntry(String),

    #[error("malformed import file: {0}")]
    MalformedImport(String),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl JournalError {
    /// True for lookups that missed (entry or template id unresolved).
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::EntryNotFound(_) | Self::TemplateNotFound(_))
    }
}
