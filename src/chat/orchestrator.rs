use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::prompt::{chat_prompt, clean_title, title_prompt};
use super::{
    model_available, ChatError, ConnectionStatus, EndpointError, GenerationEndpoint, PullProgress,
};
use crate::config::ChatConfig;
use crate::journal::context::{ContextLimits, ContextPlan};
use crate::journal::types::Entry;

/// Timing knobs for [`ChatOrchestrator`].
#[derive(Debug, Clone, Copy)]
pub struct ChatTimeouts {
    pub probe: Duration,
    pub generation: Duration,
}

impl From<&ChatConfig> for ChatTimeouts {
    fn from(config: &ChatConfig) -> Self {
        Self {
            probe: config.probe_timeout(),
            generation: config.generation_timeout(),
        }
    }
}

/// Connection tracking plus one request/response cycle per question.
///
/// Status probes are single-flight: a probe started while another one (or a
/// model pull) is running returns the last known status without calling the
/// endpoint. Chat requests are refused unless the status is `Connected`.
/// Nothing is retried or queued.
pub struct ChatOrchestrator<E> {
    endpoint: E,
    model: String,
    timeouts: ChatTimeouts,
    limits: ContextLimits,
    status: watch::Sender<ConnectionStatus>,
    busy: AtomicBool,
}

/// Run an endpoint call under `limit`, whether or not the endpoint enforces
/// the deadline it was handed.
async fn within<T>(
    limit: Duration,
    call: impl Future<Output = Result<T, EndpointError>>,
) -> Result<T, EndpointError> {
    tokio::time::timeout(limit, call)
        .await
        .unwrap_or_else(|_| Err(EndpointError::Timeout(limit)))
}

/// Releases the single-flight flag when dropped.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<E: GenerationEndpoint> ChatOrchestrator<E> {
    pub fn new(
        endpoint: E,
        model: impl Into<String>,
        timeouts: ChatTimeouts,
        limits: ContextLimits,
    ) -> Self {
        let (status, _) = watch::channel(ConnectionStatus::Disconnected);
        Self {
            endpoint,
            model: model.into(),
            timeouts,
            limits,
            status,
            busy: AtomicBool::new(false),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> &E {
        &self.endpoint
    }

    /// Last known status.
    pub fn status(&self) -> ConnectionStatus {
        *self.status.borrow()
    }

    /// Watch status transitions.
    pub fn subscribe(&self) -> watch::Receiver<ConnectionStatus> {
        self.status.subscribe()
    }

    fn set_status(&self, next: ConnectionStatus) {
        self.status.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            tracing::info!(from = %current, to = %next, "connection status changed");
            *current = next;
            true
        });
    }

    fn try_acquire(&self) -> Option<BusyGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard(&self.busy))
    }

    /// Probe the endpoint once and record the resulting status.
    pub async fn check_connection(&self) -> ConnectionStatus {
        let Some(_guard) = self.try_acquire() else {
            tracing::debug!("probe already in flight");
            return self.status();
        };

        self.set_status(ConnectionStatus::Checking);
        let probe = self.timeouts.probe;
        let next = match within(probe, self.endpoint.list_models(probe)).await {
            Ok(models) if model_available(&self.model, &models) => ConnectionStatus::Connected,
            Ok(models) => {
                tracing::warn!(model = %self.model, installed = models.len(), "selected model is not installed");
                ConnectionStatus::ModelMissing
            }
            Err(e) => {
                tracing::debug!(error = %e, "probe failed");
                e.status()
            }
        };
        self.set_status(next);
        next
    }

    fn ensure_connected(&self) -> Result<(), ChatError> {
        match self.status() {
            ConnectionStatus::Connected => Ok(()),
            other => Err(ChatError::NotConnected(other)),
        }
    }

    /// Answer a question about the journal.
    pub async fn ask(&self, question: &str, entries: &[Entry]) -> Result<String, ChatError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ChatError::EmptyQuestion);
        }
        self.ensure_connected()?;

        let plan = ContextPlan::new(question, entries, self.limits);
        tracing::info!(
            relevant = plan.relevant.len(),
            recent = plan.recent.len(),
            older_months = plan.older.len(),
            "context built"
        );
        let prompt = chat_prompt(&plan.render(), question);

        let limit = self.timeouts.generation;
        let reply = within(limit, self.endpoint.generate(&self.model, &prompt, limit)).await?;
        let reply = reply.trim();
        if reply.is_empty() {
            return Err(ChatError::Endpoint(EndpointError::Malformed(
                "empty response".into(),
            )));
        }
        Ok(reply.to_string())
    }

    /// Ask the model for a short title for `content`.
    pub async fn suggest_title(&self, content: &str) -> Result<String, ChatError> {
        self.ensure_connected()?;
        let limit = self.timeouts.generation;
        let prompt = title_prompt(content);
        let reply = within(limit, self.endpoint.generate(&self.model, &prompt, limit)).await?;
        clean_title(&reply).ok_or_else(|| {
            ChatError::Endpoint(EndpointError::Malformed("no title in response".into()))
        })
    }

    /// Download the selected model, then probe again.
    ///
    /// Holds the single-flight flag for the whole download, so periodic
    /// probes report `Downloading` instead of racing the pull.
    pub async fn pull_model(
        &self,
        on_progress: &(dyn Fn(PullProgress) + Send + Sync),
    ) -> Result<ConnectionStatus, ChatError> {
        {
            let Some(_guard) = self.try_acquire() else {
                return Err(ChatError::NotConnected(self.status()));
            };
            self.set_status(ConnectionStatus::Downloading);
            if let Err(e) = self.endpoint.pull_model(&self.model, on_progress).await {
                self.set_status(e.status());
                return Err(e.into());
            }
        }
        Ok(self.check_connection().await)
    }
}

impl<E: GenerationEndpoint + 'static> ChatOrchestrator<E> {
    /// Probe on a fixed interval until the handle is aborted.
    ///
    /// Each tick spawns its own probe; a tick landing while a probe is still
    /// outstanding is absorbed by the single-flight guard.
    pub fn spawn_status_poller(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let probe = Arc::clone(&this);
                tokio::spawn(async move {
                    probe.check_connection().await;
                });
            }
        })
    }
}
