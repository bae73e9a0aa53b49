//! Appearance and model-selection preferences, each its own blob.

use serde::{Deserialize, Serialize};

use crate::db::{KvStore, MODEL_KEY, THEME_KEY};
use crate::error::{JournalError, JournalResult};

pub const DEFAULT_THEME: &str = "default";

/// Known colour themes.
pub const THEMES: &[&str] = &["default", "sepia", "forest", "ocean", "midnight"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Light,
    Dark,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Read the terminal's background from `COLORFGBG` ("fg;bg"); background
    /// colours 0-6 and 8 are dark.
    pub fn from_colorfgbg(value: &str) -> Option<Self> {
        let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
        Some(if bg <= 6 || bg == 8 { Self::Dark } else { Self::Light })
    }

    /// Best guess at the OS / terminal preference.
    pub fn detect() -> Option<Self> {
        std::env::var("COLORFGBG")
            .ok()
            .and_then(|v| Self::from_colorfgbg(&v))
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(format!("unknown mode: {s}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemePreference {
    pub theme: String,
    pub mode: Mode,
}

/// Stored preference wins; otherwise the default theme in the OS mode
/// (light when unknown).
pub fn resolve_theme(stored: Option<ThemePreference>, os_mode: Option<Mode>) -> ThemePreference {
    stored.unwrap_or_else(|| ThemePreference {
        theme: DEFAULT_THEME.to_string(),
        mode: os_mode.unwrap_or(Mode::Light),
    })
}

/// The stored theme preference, if any. An unreadable blob counts as absent.
pub fn load_theme(kv: &KvStore) -> JournalResult<Option<ThemePreference>> {
    let Some(raw) = kv.get(THEME_KEY)? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(pref) => Ok(Some(pref)),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unreadable theme preference");
            Ok(None)
        }
    }
}

pub fn save_theme(kv: &KvStore, pref: &ThemePreference) -> JournalResult<()> {
    if !THEMES.contains(&pref.theme.as_str()) {
        return Err(JournalError::InvalidEntry(format!(
            "unknown theme '{}', expected one of: {}",
            pref.theme,
            THEMES.join(", ")
        )));
    }
    kv.set(THEME_KEY, &serde_json::to_string(pref)?)?;
    tracing::info!(theme = %pref.theme, mode = %pref.mode, "theme saved");
    Ok(())
}

/// The selected generation model, or `default` when none was chosen.
pub fn selected_model(kv: &KvStore, default: &str) -> JournalResult<String> {
    Ok(kv
        .get(MODEL_KEY)?
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| default.to_string()))
}

pub fn set_selected_model(kv: &KvStore, model: &str) -> JournalResult<()> {
    let model = model.trim();
    if model.is_empty() {
        return Err(JournalError::InvalidEntry("model name is empty".into()));
    }
    kv.set(MODEL_KEY, model)?;
    tracing::info!(model, "model selected");
    Ok(())
}
