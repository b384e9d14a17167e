//! CLI argument parsing tests

use clap::Parser;
use pcqueue::app::cli::args::*;
use pcqueue::timer::PipelineConfig;
use std::path::PathBuf;
use std::time::Duration;

static COMMAND_NAME: &str = "pcqueue";

#[test]
fn test_no_arguments_gives_default_pipeline() {
    let args = Args::try_parse_from([COMMAND_NAME]).unwrap();

    assert_eq!(args.config_file, None);
    assert_eq!(args.pipeline_config(), PipelineConfig::default());
}

#[test]
fn test_short_flags() {
    let args = Args::try_parse_from([
        COMMAND_NAME, "-s", "5", "-t", "50", "-w", "3", "-p", "20", "-l", "debug", "-o", "ext",
        "-f", "out.log", "-c", "custom.toml",
    ])
    .unwrap();

    assert_eq!(args.capacity, Some(5));
    assert_eq!(args.tasks, Some(50));
    assert_eq!(args.consumers, Some(3));
    assert_eq!(args.period_ms, Some(20));
    assert_eq!(args.log_level.as_deref(), Some("debug"));
    assert_eq!(args.log_format.as_deref(), Some("ext"));
    assert_eq!(args.log_file, Some(PathBuf::from("out.log")));
    assert_eq!(args.config_file, Some(PathBuf::from("custom.toml")));

    let config = args.pipeline_config();
    assert_eq!(config.period, Duration::from_millis(20));
    assert!(config.validate().is_ok());
}

#[test]
fn test_invalid_values_rejected() {
    let invalid: [&[&str]; 6] = [
        &[COMMAND_NAME, "--capacity", "0"],
        &[COMMAND_NAME, "--tasks", "-3"],
        &[COMMAND_NAME, "--consumers", "many"],
        &[COMMAND_NAME, "--period", "1.5"],
        &[COMMAND_NAME, "--log-level", "verbose"],
        &[COMMAND_NAME, "--log-format", "xml"],
    ];

    for argv in invalid {
        assert!(Args::try_parse_from(argv).is_err(), "{:?} should fail", argv);
    }
}

#[test]
fn test_zero_period_allowed() {
    let args = Args::try_parse_from([COMMAND_NAME, "--period", "0"]).unwrap();
    assert_eq!(args.pipeline_config().period, Duration::ZERO);
}

#[test]
fn test_verbose_and_quiet_conflict() {
    assert!(Args::try_parse_from([COMMAND_NAME, "-v", "-q"]).is_err());

    let args = Args::try_parse_from([COMMAND_NAME, "-qqq"]).unwrap();
    assert_eq!(args.verbosity(), -3);
    assert_eq!(args.effective_log_level(), "off");
}

#[test]
fn test_help_lists_pipeline_options() {
    let error = Args::try_parse_from([COMMAND_NAME, "--help"]).unwrap_err();
    let help = error.to_string();

    for option in ["--capacity", "--tasks", "--consumers", "--period", "--config-file"] {
        assert!(help.contains(option), "help should mention {}", option);
    }
}
