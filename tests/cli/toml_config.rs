//! CLI TOML configuration tests
//!
//! Loading real files from disk and the command line > file > default order.

use clap::Parser;
use pcqueue::app::cli::{Args, ConfigError};
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn args_with_file(file: &NamedTempFile, extra: &[&str]) -> Args {
    let path = file.path().to_str().unwrap().to_string();
    let mut argv = vec!["pcqueue".to_string(), "--config-file".to_string(), path];
    argv.extend(extra.iter().map(|s| s.to_string()));
    Args::try_parse_from(argv).unwrap()
}

#[test]
fn test_file_overrides_defaults() {
    let file = config_file(
        r#"
        capacity = 3
        consumers = 2
        period-ms = 0
        log-format = "json"
        "#,
    );
    let mut args = args_with_file(&file, &[]);

    let loaded = args.load_config_file().unwrap();
    assert_eq!(loaded.as_deref(), Some(file.path()));

    let config = args.pipeline_config();
    assert_eq!(config.capacity, 3);
    assert_eq!(config.consumers, 2);
    assert_eq!(config.period, Duration::ZERO);
    // Not in the file, so still the default
    assert_eq!(config.tasks, 20);
    assert_eq!(args.log_format.as_deref(), Some("json"));
}

#[test]
fn test_command_line_overrides_file() {
    let file = config_file("capacity = 3\ntasks = 100\n");
    let mut args = args_with_file(&file, &["--tasks", "7"]);

    args.load_config_file().unwrap();

    let config = args.pipeline_config();
    assert_eq!(config.capacity, 3);
    assert_eq!(config.tasks, 7);
}

#[test]
fn test_log_file_none_in_file_disables_logging_to_file() {
    let file = config_file("log-file = \"none\"\n");
    let mut args = args_with_file(&file, &[]);

    args.load_config_file().unwrap();
    assert_eq!(args.log_file_path(), None);
}

#[test]
fn test_syntax_error_reported_as_parse_error() {
    let file = config_file("capacity = = 3\n");
    let mut args = args_with_file(&file, &[]);

    match args.load_config_file() {
        Err(ConfigError::Parse { path, .. }) => assert_eq!(path, file.path()),
        other => panic!("Expected parse error, got {:?}", other),
    }
}

#[test]
fn test_invalid_value_reported_with_key() {
    let file = config_file("consumers = 0\n");
    let mut args = args_with_file(&file, &[]);

    let error = args.load_config_file().unwrap_err();
    assert!(matches!(error, ConfigError::Invalid { .. }));
    assert!(error.to_string().contains("consumers"), "got: {}", error);
}

#[test]
fn test_unknown_key_rejected() {
    let file = config_file("capacity = 3\nbuffer = 9\n");
    let mut args = args_with_file(&file, &[]);

    let error = args.load_config_file().unwrap_err();
    assert!(error.to_string().contains("buffer"), "got: {}", error);
}
