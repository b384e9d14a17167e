//! CLI Integration Tests
//!
//! Tests are organized by functionality:
//! - `cli::argument_parsing` - command line flags, validation and help output
//! - `cli::toml_config` - config file loading and precedence over defaults

mod cli;
