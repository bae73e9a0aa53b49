use jot::config::JotConfig;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn missing_file_yields_defaults() {
    let tmp = TempDir::new().unwrap();
    let config = JotConfig::load_from(tmp.path().join("absent.toml")).unwrap();
    assert_eq!(config.chat.probe_timeout(), Duration::from_secs(3));
    assert_eq!(config.autosave.debounce(), Duration::from_millis(1000));
    assert_eq!(config.context.limits().recent_limit, 15);
}

#[test]
fn partial_file_overrides_only_given_keys() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[storage]
db_path = "/tmp/jot-test/journal.db"

[context]
recent_limit = 5
"#,
    )
    .unwrap();

    let config = JotConfig::load_from(&path).unwrap();
    assert_eq!(config.context.recent_limit, 5);
    assert_eq!(config.context.relevant_chars, 500);
    assert_eq!(config.chat.default_model, "llama3.2:3b");
}

#[test]
fn invalid_toml_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("config.toml");
    std::fs::write(&path, "[chat\nbase_url = ").unwrap();
    assert!(JotConfig::load_from(&path).is_err());
}
