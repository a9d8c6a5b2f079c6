// SPDX-FileCopyrightText: 2026 SanctuPoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the SanctuPoint configuration system.

use sanctupoint_config::diagnostic::ConfigError;
use sanctupoint_config::model::SanctuConfig;
use sanctupoint_config::{load_and_validate_str, load_config_from_path, load_config_from_str};
use serial_test::serial;

#[test]
fn valid_toml_deserializes() {
    let toml = r#"
[app]
name = "St. Jude Parish"
log_level = "debug"

[storage]
database_path = "/tmp/sanctupoint-test.db"
wal_mode = false

[auth]
hash_memory_cost = 8192
hash_iterations = 1
hash_parallelism = 2
min_password_length = 8

[realtime]
coalesce_window_ms = 50
fetch_timeout_secs = 3
"#;

    let config = load_and_validate_str(toml).expect("valid TOML should load");
    assert_eq!(config.app.name, "St. Jude Parish");
    assert_eq!(config.app.log_level, "debug");
    assert_eq!(config.storage.database_path, "/tmp/sanctupoint-test.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.auth.hash_memory_cost, 8192);
    assert_eq!(config.auth.hash_parallelism, 2);
    assert_eq!(config.auth.min_password_length, 8);
    assert_eq!(config.realtime.coalesce_window().as_millis(), 50);
    assert_eq!(config.realtime.fetch_timeout().as_secs(), 3);
}

#[test]
fn empty_toml_uses_defaults() {
    let config = load_config_from_str("").expect("empty config is valid");
    let defaults = SanctuConfig::default();
    assert_eq!(config.app.name, defaults.app.name);
    assert_eq!(config.auth.hash_memory_cost, 19456);
    assert!(config.storage.wal_mode);
    assert!(config.storage.database_path.ends_with("sanctupoint.db"));
}

#[test]
fn unknown_key_gets_suggestion_and_span() {
    let toml = "[storage]\ndatabse_path = \"/tmp/x.db\"\n";
    let errors = load_and_validate_str(toml).expect_err("unknown key must be rejected");
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        ConfigError::UnknownKey {
            key,
            suggestion,
            valid_keys,
            span,
            ..
        } => {
            assert_eq!(key, "databse_path");
            assert_eq!(suggestion.as_deref(), Some("database_path"));
            assert!(valid_keys.contains("wal_mode"));
            assert!(span.is_some());
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

#[test]
fn unknown_section_is_rejected() {
    let toml = "[realtme]\ncoalesce_window_ms = 10\n";
    let errors = load_and_validate_str(toml).expect_err("unknown section");
    assert!(matches!(
        &errors[0],
        ConfigError::UnknownKey { suggestion: Some(s), .. } if s == "realtime"
    ));
}

#[test]
fn wrong_type_reports_dotted_key() {
    let toml = "[storage]\nwal_mode = \"yes\"\n";
    let errors = load_and_validate_str(toml).expect_err("type mismatch");
    match &errors[0] {
        ConfigError::InvalidType { key, .. } => assert_eq!(key, "storage.wal_mode"),
        other => panic!("expected InvalidType, got {other:?}"),
    }
}

#[test]
fn semantic_validation_runs_after_parse() {
    let toml = "[auth]\nhash_memory_cost = 64\n";
    let errors = load_and_validate_str(toml).expect_err("too little memory");
    assert!(matches!(&errors[0], ConfigError::Validation { message } if message.contains("hash_memory_cost")));
}

#[test]
#[serial]
fn env_overrides_file_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sanctupoint.toml");
    std::fs::write(&path, "[storage]\ndatabase_path = \"/from/file.db\"\n").unwrap();

    // SAFETY: serialized with every other env-mutating test.
    unsafe {
        std::env::set_var("SANCTUPOINT_STORAGE_DATABASE_PATH", "/from/env.db");
        std::env::set_var("SANCTUPOINT_REALTIME_FETCH_TIMEOUT_SECS", "4");
    }
    let result = load_config_from_path(&path);
    unsafe {
        std::env::remove_var("SANCTUPOINT_STORAGE_DATABASE_PATH");
        std::env::remove_var("SANCTUPOINT_REALTIME_FETCH_TIMEOUT_SECS");
    }

    let config = result.expect("file plus env should load");
    assert_eq!(config.storage.database_path, "/from/env.db");
    assert_eq!(config.realtime.fetch_timeout_secs, 4);
}

#[test]
#[serial]
fn file_values_apply_without_env() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sanctupoint.toml");
    std::fs::write(&path, "[app]\nname = \"Chapel\"\n").unwrap();

    let config = load_config_from_path(&path).expect("file should load");
    assert_eq!(config.app.name, "Chapel");
}
