//! Local-first journaling with an optional on-device AI companion.
//!
//! Jot keeps journal entries in a single SQLite file and never sends them
//! anywhere except to a model server running on the same machine. Up to five
//! entries can be promoted to reusable templates alongside two built-in ones.
//!
//! # Architecture
//!
//! - **Storage**: SQLite key-value table holding one JSON blob per concern
//!   (entries, theme, selected model)
//! - **Templates**: fixed pool of five ordered slots, always assigned from the
//!   smallest free index
//! - **Context**: deterministic summary of the journal (relevant, recent, older
//!   by month) sized for a small local model
//! - **Chat**: Ollama-compatible HTTP endpoint probed on an interval; questions
//!   are only sent while it reports the selected model as installed
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from TOML files and environment variables
//! - [`db`]: SQLite initialization, schema, migrations, key-value access and health checks
//! - [`journal`]: Entries, templates, context building, autosave, preferences and export
//! - [`chat`]: Connection tracking and question answering over a local model
//! - [`error`]: Domain error types

pub mod chat;
pub mod config;
pub mod db;
pub mod error;
pub mod journal;
