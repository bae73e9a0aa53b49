//! Local AI chat over the journal.
//!
//! The [`GenerationEndpoint`] trait is the seam to the model server; the
//! [`ChatOrchestrator`](orchestrator::ChatOrchestrator) tracks connection status
//! and runs one request/response cycle per question. [`ollama`] provides the
//! HTTP implementation.

pub mod ollama;
pub mod orchestrator;
pub mod prompt;

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

pub use orchestrator::ChatOrchestrator;

/// Connection state of the model server, as last observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectionStatus {
    /// No successful probe yet, or the server answered with an error.
    Disconnected,
    /// A probe is in flight.
    Checking,
    /// Server reachable and the selected model is installed.
    Connected,
    /// The selected model is being pulled.
    Downloading,
    /// Server reachable but the selected model is not installed.
    ModelMissing,
    /// The probe exceeded its deadline.
    Timeout,
    /// Nothing is listening at the configured address.
    NotInstalled,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Checking => "checking",
            Self::Connected => "connected",
            Self::Downloading => "downloading",
            Self::ModelMissing => "model-missing",
            Self::Timeout => "timeout",
            Self::NotInstalled => "not-installed",
        }
    }
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transport-level failures from a [`GenerationEndpoint`].
#[derive(Error, Debug)]
pub enum EndpointError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("endpoint unreachable: {0}")]
    Unreachable(String),

    #[error("endpoint returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl EndpointError {
    /// The status a probe ending in this error leaves behind.
    pub fn status(&self) -> ConnectionStatus {
        match self {
            Self::Timeout(_) => ConnectionStatus::Timeout,
            Self::Unreachable(_) => ConnectionStatus::NotInstalled,
            Self::Http { .. } | Self::Malformed(_) => ConnectionStatus::Disconnected,
        }
    }
}

/// Failures surfaced to the caller of a chat operation.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("AI chat is unavailable (status: {0})")]
    NotConnected(ConnectionStatus),

    #[error("question is empty")]
    EmptyQuestion,

    #[error("the model did not answer within {0:?}")]
    Timeout(Duration),

    #[error("model request failed: {0}")]
    Endpoint(EndpointError),
}

impl From<EndpointError> for ChatError {
    fn from(err: EndpointError) -> Self {
        match err {
            EndpointError::Timeout(d) => ChatError::Timeout(d),
            other => ChatError::Endpoint(other),
        }
    }
}

/// One progress line from a model pull.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullProgress {
    pub status: String,
    pub completed: Option<u64>,
    pub total: Option<u64>,
}

/// A local text-generation service.
#[async_trait]
pub trait GenerationEndpoint: Send + Sync {
    /// Names of the installed models.
    async fn list_models(&self, timeout: Duration) -> Result<Vec<String>, EndpointError>;

    /// Single-shot completion of `prompt` by `model`.
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        timeout: Duration,
    ) -> Result<String, EndpointError>;

    /// Download `model`, reporting progress as it goes.
    async fn pull_model(
        &self,
        model: &str,
        on_progress: &(dyn Fn(PullProgress) + Send + Sync),
    ) -> Result<(), EndpointError>;
}

/// Loose availability check: the selected name is split into family and
/// variant at `:` and both must occur in one installed model name.
pub fn model_available(selected: &str, installed: &[String]) -> bool {
    let (family, variant) = match selected.split_once(':') {
        Some((family, variant)) => (family, Some(variant)),
        None => (selected, None),
    };
    installed.iter().any(|name| {
        name.contains(family) && variant.map_or(true, |v| name.contains(v))
    })
}
