//! Command line arguments
//!
//! Valued options are `Option`s so that the config file only fills in what
//! the command line left unset. Boolean flags can only switch a setting on.

use crate::core::validation::{validate_period_ms, validate_positive_int};
use crate::timer::{
    PipelineConfig, DEFAULT_CAPACITY, DEFAULT_CONSUMERS, DEFAULT_PERIOD, DEFAULT_TASKS,
};
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "pcqueue")]
#[command(about = "Periodic producer feeding a pool of consumers through a bounded queue")]
#[command(version)]
#[command(
    after_help = "Values given on the command line override the config file, which overrides the built-in defaults."
)]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Queue capacity [default: 10]
    #[arg(short = 's', long = "capacity", value_name = "N", value_parser = validate_positive_int)]
    pub capacity: Option<usize>,

    /// Number of items the producer emits [default: 20]
    #[arg(short = 't', long = "tasks", value_name = "N", value_parser = validate_positive_int)]
    pub tasks: Option<usize>,

    /// Number of consumer threads [default: 10]
    #[arg(short = 'w', long = "consumers", value_name = "N", value_parser = validate_positive_int)]
    pub consumers: Option<usize>,

    /// Producer period in milliseconds [default: 100]
    #[arg(short = 'p', long = "period", value_name = "MS", value_parser = validate_period_ms)]
    pub period_ms: Option<u64>,

    /// Subtract the time spent blocked on a full queue from the next sleep
    #[arg(long = "drift-correction")]
    pub drift_correction: bool,

    /// Force colored output
    #[arg(long = "color", conflicts_with = "no_color")]
    pub force_color: bool,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Colour setting from the config file, used when neither flag is given
    #[arg(skip)]
    pub color: Option<bool>,

    /// Log level
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = ["trace", "debug", "info", "warn", "error", "off"])]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(short = 'o', long = "log-format", value_name = "FORMAT", value_parser = ["text", "ext", "json"])]
    pub log_format: Option<String>,

    /// Log file path (use 'none' to disable file logging)
    #[arg(short = 'f', long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Increase verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Decrease verbosity (repeatable)
    #[arg(short = 'q', long = "quiet", action = ArgAction::Count)]
    pub quiet: u8,
}

impl Args {
    /// Pipeline settings with defaults filled in for anything left unset
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            capacity: self.capacity.unwrap_or(DEFAULT_CAPACITY),
            tasks: self
                .tasks
                .map(|tasks| tasks as u64)
                .unwrap_or(DEFAULT_TASKS),
            consumers: self.consumers.unwrap_or(DEFAULT_CONSUMERS),
            period: self
                .period_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_PERIOD),
            drift_correction: self.drift_correction,
        }
    }

    /// Net `-v`/`-q` count, positive meaning more output
    pub fn verbosity(&self) -> i8 {
        let verbose = self.verbose.min(i8::MAX as u8) as i8;
        let quiet = self.quiet.min(i8::MAX as u8) as i8;
        verbose - quiet
    }

    /// Explicit colour choice; `None` means detect from the terminal
    pub fn color_choice(&self) -> Option<bool> {
        if self.no_color {
            Some(false)
        } else if self.force_color {
            Some(true)
        } else {
            self.color
        }
    }

    /// Effective colour setting after terminal detection
    pub fn use_color(&self) -> bool {
        use std::io::IsTerminal;
        self.color_choice()
            .unwrap_or_else(|| std::io::stderr().is_terminal())
    }

    /// Log level after applying `-v`/`-q`
    pub fn effective_log_level(&self) -> &'static str {
        crate::core::logging::adjust_level(
            self.log_level.as_deref().unwrap_or("info"),
            self.verbosity(),
        )
    }

    /// Log file, unless disabled with `none`
    pub fn log_file_path(&self) -> Option<&str> {
        self.log_file
            .as_deref()
            .and_then(|path| path.to_str())
            .filter(|path| !path.eq_ignore_ascii_case("none") && *path != "-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_args_give_defaults() {
        let args = Args::try_parse_from(["pcqueue"]).unwrap();
        assert_eq!(args.pipeline_config(), PipelineConfig::default());
        assert_eq!(args.verbosity(), 0);
        assert_eq!(args.color_choice(), None);
        assert_eq!(args.effective_log_level(), "info");
        assert_eq!(args.log_file_path(), None);
    }

    #[test]
    fn test_pipeline_flags() {
        let args = Args::try_parse_from([
            "pcqueue",
            "--capacity",
            "3",
            "-t",
            "7",
            "-w",
            "2",
            "--period",
            "0",
            "--drift-correction",
        ])
        .unwrap();

        let config = args.pipeline_config();
        assert_eq!(config.capacity, 3);
        assert_eq!(config.tasks, 7);
        assert_eq!(config.consumers, 2);
        assert_eq!(config.period, Duration::ZERO);
        assert!(config.drift_correction);
    }

    #[test]
    fn test_zero_counts_rejected_by_parser() {
        for flag in ["--capacity", "--tasks", "--consumers"] {
            assert!(
                Args::try_parse_from(["pcqueue", flag, "0"]).is_err(),
                "{} 0 should be rejected",
                flag
            );
        }
    }

    #[test]
    fn test_verbosity_shifts_log_level() {
        let args = Args::try_parse_from(["pcqueue", "-vv"]).unwrap();
        assert_eq!(args.verbosity(), 2);
        assert_eq!(args.effective_log_level(), "trace");

        let args = Args::try_parse_from(["pcqueue", "-l", "warn", "-q"]).unwrap();
        assert_eq!(args.effective_log_level(), "error");
    }

    #[test]
    fn test_no_color_wins() {
        let args = Args::try_parse_from(["pcqueue", "--no-color"]).unwrap();
        assert_eq!(args.color_choice(), Some(false));
        assert!(!args.use_color());

        assert!(Args::try_parse_from(["pcqueue", "--color", "--no-color"]).is_err());
    }

    #[test]
    fn test_log_file_none_disables_file_logging() {
        let args = Args::try_parse_from(["pcqueue", "-f", "none"]).unwrap();
        assert_eq!(args.log_file_path(), None);

        let args = Args::try_parse_from(["pcqueue", "-f", "run.log"]).unwrap();
        assert_eq!(args.log_file_path(), Some("run.log"));
    }
}
