//! Unit tests for config module

use snapview::Config;
use tempfile::TempDir;

#[test]
fn default_config_has_expected_values() {
    let config = Config::default();
    assert_eq!(config.preview.cache_limit, 20);
    assert_eq!(config.preview.workers, 4);
    assert_eq!(config.preview.empty_error_text, "No preview available");
    assert_eq!(config.preview.load_error_text, "Failed to load preview");
    assert_eq!(config.preview.settle_timeout_ms, 5000);
    assert_eq!(config.storage.directory, "~/.local/share/snapview/snapshots");
}

#[test]
fn config_serialization_roundtrip() {
    let config = Config::default();
    let toml_str = toml::to_string(&config).unwrap();
    let parsed: Config = toml::from_str(&toml_str).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn preview_section_defaults_when_partial() {
    let toml_str = r#"
[preview]
cache_limit = 3
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.preview.cache_limit, 3);
    assert_eq!(config.preview.workers, 4);
    assert_eq!(config.preview.empty_error_text, "No preview available");
}

#[test]
fn custom_messages_parse() {
    let toml_str = r#"
[preview]
empty_error_text = "暂无预览图"
load_error_text = "预览加载失败"
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.preview.empty_error_text, "暂无预览图");
    assert_eq!(config.preview.load_error_text, "预览加载失败");
}

#[test]
fn storage_directory_expands_tilde() {
    let config = Config::default();
    let dir = config.storage_directory();
    if let Some(home) = dirs::home_dir() {
        assert!(dir.starts_with(home));
    }
    assert!(dir.ends_with(".local/share/snapview/snapshots"));
}

#[test]
fn storage_directory_absolute_unchanged() {
    let mut config = Config::default();
    config.storage.directory = "/var/snapshots".to_string();
    assert_eq!(
        config.storage_directory(),
        std::path::PathBuf::from("/var/snapshots")
    );
}

#[test]
fn save_then_load_from_path() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested").join("config.toml");

    let mut config = Config::default();
    config.preview.cache_limit = 7;
    config.storage.directory = "/data/snaps".to_string();
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn load_from_missing_path_returns_defaults() {
    let temp = TempDir::new().unwrap();
    let loaded = Config::load_from(&temp.path().join("missing.toml")).unwrap();
    assert_eq!(loaded, Config::default());
}

#[test]
fn load_from_rejects_zero_workers() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    std::fs::write(&path, "[preview]\nworkers = 0\n").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("workers"));
}

#[test]
fn load_from_reports_parse_errors() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    std::fs::write(&path, "[preview\n").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
}
