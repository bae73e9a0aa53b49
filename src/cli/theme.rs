use anyhow::Result;

use jot::config::JotConfig;
use jot::journal::prefs::{self, Mode, ThemePreference, THEMES};

use super::open_kv;

pub fn get(config: &JotConfig) -> Result<()> {
    let kv = open_kv(config)?;
    let stored = prefs::load_theme(&kv)?;
    let source = if stored.is_some() { "stored" } else { "default" };
    let active = prefs::resolve_theme(stored, Mode::detect());

    println!("Theme: {} ({}, {source})", active.theme, active.mode);
    println!("Available: {}", THEMES.join(", "));
    Ok(())
}

/// Store a theme. Without an explicit mode the stored one is kept, else the
/// terminal's mode is used.
pub fn set(config: &JotConfig, theme: &str, mode: Option<Mode>) -> Result<()> {
    let kv = open_kv(config)?;
    let mode = match mode {
        Some(mode) => mode,
        None => prefs::load_theme(&kv)?
            .map(|p| p.mode)
            .or_else(Mode::detect)
            .unwrap_or(Mode::Light),
    };
    let pref = ThemePreference {
        theme: theme.to_string(),
        mode,
    };
    prefs::save_theme(&kv, &pref)?;
    println!("Theme set to {} ({}).", pref.theme, pref.mode);
    Ok(())
}
