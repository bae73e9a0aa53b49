//! [`GenerationEndpoint`] over the Ollama HTTP API.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use super::{EndpointError, GenerationEndpoint, PullProgress};

#[derive(Debug, Clone)]
pub struct OllamaEndpoint {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Deserialize)]
struct ModelTag {
    name: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

#[derive(Deserialize)]
struct PullLine {
    #[serde(default)]
    status: String,
    completed: Option<u64>,
    total: Option<u64>,
    error: Option<String>,
}

impl OllamaEndpoint {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Map a transport error, keeping timeouts and refused connections apart.
fn transport_error(err: reqwest::Error, timeout: Duration) -> EndpointError {
    if err.is_timeout() {
        EndpointError::Timeout(timeout)
    } else if err.is_connect() {
        EndpointError::Unreachable(err.to_string())
    } else if err.is_decode() {
        EndpointError::Malformed(err.to_string())
    } else {
        EndpointError::Unreachable(err.to_string())
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, EndpointError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(EndpointError::Http {
        status: status.as_u16(),
        body,
    })
}

/// Splits a byte stream into lines, decoding only complete lines so a
/// multi-byte character split across chunks survives.
#[derive(Default)]
struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);
        let mut lines = Vec::new();
        while let Some(newline) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=newline).collect();
            lines.push(String::from_utf8_lossy(&line).into_owned());
        }
        lines
    }

    fn finish(self) -> String {
        String::from_utf8_lossy(&self.pending).into_owned()
    }
}

fn parse_pull_line(line: &str) -> Result<Option<PullProgress>, EndpointError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let parsed: PullLine =
        serde_json::from_str(line).map_err(|e| EndpointError::Malformed(e.to_string()))?;
    if let Some(error) = parsed.error {
        return Err(EndpointError::Malformed(error));
    }
    Ok(Some(PullProgress {
        status: parsed.status,
        completed: parsed.completed,
        total: parsed.total,
    }))
}

#[async_trait]
impl GenerationEndpoint for OllamaEndpoint {
    async fn list_models(&self, timeout: Duration) -> Result<Vec<String>, EndpointError> {
        let response = self
            .client
            .get(self.url("/api/tags"))
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| transport_error(e, timeout))?;
        let tags: TagsResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| transport_error(e, timeout))?;

        let models: Vec<String> = tags.models.into_iter().map(|m| m.name).collect();
        tracing::debug!(count = models.len(), "listed installed models");
        Ok(models)
    }

    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        timeout: Duration,
    ) -> Result<String, EndpointError> {
        let payload = json!({
            "model": model,
            "prompt": prompt,
            "stream": false
        });

        tracing::info!(model, prompt_len = prompt.len(), "sending generation request");
        let response = self
            .client
            .post(self.url("/api/generate"))
            .timeout(timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| transport_error(e, timeout))?;
        let body: GenerateResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| transport_error(e, timeout))?;

        body.response
            .ok_or_else(|| EndpointError::Malformed("response field missing".into()))
    }

    async fn pull_model(
        &self,
        model: &str,
        on_progress: &(dyn Fn(PullProgress) + Send + Sync),
    ) -> Result<(), EndpointError> {
        // No overall deadline: model downloads can take a long time.
        let mut response = self
            .client
            .post(self.url("/api/pull"))
            .json(&json!({ "model": model, "stream": true }))
            .send()
            .await
            .map_err(|e| transport_error(e, Duration::ZERO))?;
        response = check_status(response).await?;

        let mut lines = LineBuffer::default();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| transport_error(e, Duration::ZERO))?
        {
            for line in lines.push(&chunk) {
                if let Some(progress) = parse_pull_line(&line)? {
                    on_progress(progress);
                }
            }
        }
        if let Some(progress) = parse_pull_line(&lines.finish())? {
            on_progress(progress);
        }

        tracing::info!(model, "model pull finished");
        Ok(())
    }
}
