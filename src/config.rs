use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::journal::context::ContextLimits;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct JotConfig {
    pub general: GeneralConfig,
    pub storage: StorageConfig,
    pub chat: ChatConfig,
    pub autosave: AutosaveConfig,
    pub context: ContextConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ChatConfig {
    pub base_url: String,
    pub default_model: String,
    pub probe_timeout_secs: u64,
    pub generation_timeout_secs: u64,
    pub poll_interval_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AutosaveConfig {
    pub debounce_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ContextConfig {
    pub relevant_chars: usize,
    pub recent_chars: usize,
    pub recent_limit: usize,
    pub theme_words: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let db_path = default_jot_dir()
            .join("journal.db")
            .to_string_lossy()
            .into_owned();
        Self { db_path }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".into(),
            default_model: "llama3.2:3b".into(),
            probe_timeout_secs: 3,
            generation_timeout_secs: 120,
            poll_interval_secs: 30,
        }
    }
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self { debounce_ms: 1000 }
    }
}

impl Default for ContextConfig {
    fn default() -> Self {
        let limits = ContextLimits::default();
        Self {
            relevant_chars: limits.relevant_chars,
            recent_chars: limits.recent_chars,
            recent_limit: limits.recent_limit,
            theme_words: limits.theme_words,
        }
    }
}

impl ChatConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

impl AutosaveConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl ContextConfig {
    pub fn limits(&self) -> ContextLimits {
        ContextLimits {
            relevant_chars: self.relevant_chars,
            recent_chars: self.recent_chars,
            recent_limit: self.recent_limit,
            theme_words: self.theme_words,
        }
    }
}

/// Returns `~/.jot/`
pub fn default_jot_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".jot")
}

/// Returns the default config file path: `~/.jot/config.toml`
pub fn default_config_path() -> PathBuf {
    default_jot_dir().join("config.toml")
}

impl JotConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            JotConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (JOT_DB, JOT_LOG_LEVEL, JOT_OLLAMA_URL, JOT_MODEL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("JOT_DB") {
            self.storage.db_path = val;
        }
        if let Ok(val) = std::env::var("JOT_LOG_LEVEL") {
            self.general.log_level = val;
        }
        if let Ok(val) = std::env::var("JOT_OLLAMA_URL") {
            self.chat.base_url = val;
        }
        if let Ok(val) = std::env::var("JOT_MODEL") {
            self.chat.default_model = val;
        }
    }

    /// Resolve the database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
