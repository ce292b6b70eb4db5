//! Integration tests for layered configuration.
//!
//! These tests cover defaults, TOML files, environment variable overrides and
//! CLI flag overrides, in that priority order.

use clap::Parser;
use sheetdupe::cli::{Cli, Commands, OutputFormat};
use sheetdupe::config::{Config, ConfigError};
use std::fs;
use std::sync::Mutex;
use tempfile::tempdir;

static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Clear all SHEETDUPE_* environment variables to avoid interference.
fn clear_env() {
    for (key, _) in std::env::vars() {
        if key.starts_with("SHEETDUPE_") {
            std::env::remove_var(key);
        }
    }
}

#[test]
fn test_config_load_from_toml() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
columns_to_skip = 2
min_repeats = 4
extensions = ["xlsx"]
output_format = "json"

[sheets]
duplicates = "Dupes"
"#,
    )
    .unwrap();

    let config = Config::load(Some(path.as_path())).unwrap();
    assert_eq!(config.columns_to_skip, 2);
    assert_eq!(config.min_repeats, 4);
    assert_eq!(config.sort_column, 3);
    assert_eq!(config.extensions, vec!["xlsx".to_string()]);
    assert_eq!(config.output_format, OutputFormat::Json);
    assert_eq!(config.sheets.duplicates, "Dupes");
    assert_eq!(config.sheets.repeats, "Repeats");
}

#[test]
fn test_config_env_overrides_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "min_repeats = 4\n").unwrap();

    std::env::set_var("SHEETDUPE_MIN_REPEATS", "5");
    std::env::set_var("SHEETDUPE_SHEETS__REPEATS", "Triples");
    let config = Config::load(Some(path.as_path()));
    clear_env();

    let config = config.unwrap();
    assert_eq!(config.min_repeats, 5);
    assert_eq!(config.sheets.repeats, "Triples");
}

#[test]
fn test_config_cli_overrides_everything() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    std::env::set_var("SHEETDUPE_COLUMNS_TO_SKIP", "5");
    let loaded = Config::load(None);
    clear_env();
    let mut config = loaded.unwrap();
    assert_eq!(config.columns_to_skip, 5);

    let cli = Cli::try_parse_from(["sheetdupe", "scan", "--columns-to-skip", "2"]).unwrap();
    match cli.command {
        Commands::Scan(args) => config.apply_overrides(&args.classify),
        _ => panic!("Expected Scan command"),
    }
    assert_eq!(config.columns_to_skip, 2);
}

#[test]
fn test_config_missing_explicit_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();

    match Config::load(Some(dir.path().join("nope.toml").as_path())) {
        Err(ConfigError::NotFound(path)) => assert!(path.ends_with("nope.toml")),
        other => panic!("Expected NotFound, got {:?}", other),
    }
}

#[test]
fn test_config_invalid_toml() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "min_repeats = \"many\"\n").unwrap();

    assert!(matches!(
        Config::load(Some(path.as_path())),
        Err(ConfigError::Extract(_))
    ));
}

#[test]
fn test_config_rejects_zero_from_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "columns_to_skip = 0\n").unwrap();

    match Config::load(Some(path.as_path())) {
        Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, "columns_to_skip"),
        other => panic!("Expected Invalid, got {:?}", other),
    }
}

#[test]
fn test_config_save_round_trip() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let config = Config {
        min_repeats: 7,
        skip_empty_outputs: true,
        ..Config::default()
    };
    config.save(&path).unwrap();

    let saved = fs::read_to_string(&path).unwrap();
    assert!(saved.contains("min_repeats = 7"));
    assert!(saved.contains("output_format = \"xlsx\""));

    assert_eq!(Config::load(Some(path.as_path())).unwrap(), config);
}
