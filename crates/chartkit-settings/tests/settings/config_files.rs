use std::time::Duration;

use chartkit_settings::{Config, ConfigError, SettingsError};
use tempfile::TempDir;

#[test]
fn test_save_and_load_toml() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("nested").join("config.toml");

    let mut config = Config::default();
    config.interaction.hover_px = 12.0;
    config.theme.active.color = "#00e676".to_string();
    config.backend.base_url = "https://drawings.example.com/api".to_string();
    config.save_to_file(&path).expect("save");

    let loaded = Config::load_from_file(&path).expect("load");
    assert_eq!(loaded, config);
    assert_eq!(loaded.to_engine_settings().thresholds.hover_sq, 144.0);
}

#[test]
fn test_save_and_load_json() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("config.json");

    let mut config = Config::default();
    config.backend.timeout_ms = 2_500;
    config.save_to_file(&path).expect("save");

    let loaded = Config::load_from_file(&path).expect("load");
    assert_eq!(loaded.to_backend_config().timeout, Duration::from_millis(2_500));
}

#[test]
fn test_partial_file_uses_defaults() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[interaction]\nclick_px = 25.0\n").expect("write");

    let loaded = Config::load_from_file(&path).expect("load");
    assert_eq!(loaded.interaction.click_px, 25.0);
    assert_eq!(loaded.interaction.hover_px, 15.0);
    assert_eq!(loaded.theme, Config::default().theme);
}

#[test]
fn test_invalid_values_rejected_on_load() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"interaction": {"marker_px": -1.0}}"#).expect("write");

    let err = Config::load_from_file(&path).unwrap_err();
    assert!(matches!(
        err,
        SettingsError::Config(ConfigError::ValueOutOfRange { .. })
    ));
}

#[test]
fn test_unsupported_extension() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("config.yaml");
    let err = Config::default().save_to_file(&path).unwrap_err();
    assert!(matches!(
        err,
        SettingsError::Config(ConfigError::UnsupportedFormat(_))
    ));
    assert!(!path.exists());
}

#[test]
fn test_malformed_toml() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[interaction\nhover_px = ").expect("write");
    assert!(matches!(
        Config::load_from_file(&path),
        Err(SettingsError::TomlError(_))
    ));
}
