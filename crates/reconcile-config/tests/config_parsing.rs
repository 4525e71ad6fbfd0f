use std::{env, fs};

use reconcile_config::{load_config, ConfigError, EventSink, LogFormat};

#[test]
fn config_parsing_and_env_overrides_and_validation() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("reconcile.toml");

    let toml_content = r#"
[logging]
level = "debug"
format = "json"

[events]
component = "cluster-operator"
sink = "log_and_broadcast"
buffer_size = 64
"#;
    fs::write(&path, toml_content).expect("write toml");

    // 1) Valid config parses
    let cfg = load_config(path.to_str()).expect("should parse config");
    assert_eq!(cfg.logging.level, "debug");
    assert_eq!(cfg.logging.format, LogFormat::Json);
    assert_eq!(cfg.events.component, "cluster-operator");
    assert_eq!(cfg.events.sink, EventSink::LogAndBroadcast);
    assert_eq!(cfg.events.buffer_size, 64);

    // 2) Env override should win over file
    unsafe {
        env::set_var("RECONCILE__EVENTS__BUFFER_SIZE", "9");
    }
    let cfg_env = load_config(path.to_str()).expect("should parse config with env overrides");
    assert_eq!(cfg_env.events.buffer_size, 9);
    unsafe {
        env::remove_var("RECONCILE__EVENTS__BUFFER_SIZE");
    }

    // 3) Invalid values fail validation
    let bad_path = dir.path().join("bad.toml");
    fs::write(&bad_path, "[events]\nbuffer_size = 0\n").expect("write bad toml");
    let err = load_config(bad_path.to_str()).expect_err("zero buffer should be rejected");
    assert!(matches!(err, ConfigError::Validation(_)));

    // 4) Unknown sink is a parse error
    let unknown_path = dir.path().join("unknown.toml");
    fs::write(&unknown_path, "[events]\nsink = \"pigeon\"\n").expect("write toml");
    let err = load_config(unknown_path.to_str()).expect_err("unknown sink should be rejected");
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn explicit_missing_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("absent.toml");
    let err = load_config(path.to_str()).expect_err("missing file");
    assert!(matches!(err, ConfigError::MissingFile(_)));
}

#[test]
fn partial_file_keeps_defaults() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("partial.toml");
    fs::write(&path, "[logging]\nlevel = \"warn\"\n").expect("write toml");

    let cfg = load_config(path.to_str()).expect("should parse config");
    assert_eq!(cfg.logging.level, "warn");
    assert_eq!(cfg.logging.format, LogFormat::Pretty);
    assert_eq!(cfg.events.component, "reconcile");
    assert_eq!(cfg.events.sink, EventSink::Log);
}
