//! Validation utilities for CLI arguments and configuration values

use crate::core::error_handling::ContextualError;
use std::fmt;
use std::time::Duration;

/// A configuration value was rejected; the message is shown to the user as-is
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

impl ContextualError for ValidationError {
    fn is_user_actionable(&self) -> bool {
        true
    }

    fn user_message(&self) -> Option<&str> {
        Some(&self.message)
    }
}

/// Validate positive integer value (clap `value_parser` compatible)
pub fn validate_positive_int(value: &str) -> Result<usize, String> {
    match value.trim().parse::<usize>() {
        Ok(0) => Err("Value must be greater than 0".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("'{}' is not a valid positive integer", value)),
    }
}

/// Validate a period given in whole milliseconds; zero is allowed
pub fn validate_period_ms(value: &str) -> Result<u64, String> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| format!("'{}' is not a valid number of milliseconds", value))
}

/// Reject zero for a named count
pub fn require_positive(name: &str, value: u64) -> Result<(), ValidationError> {
    if value == 0 {
        return Err(ValidationError::new(format!(
            "Option {} must be greater than 0",
            name
        )));
    }
    Ok(())
}

/// Convert a TOML integer into a positive count
pub fn positive_from_toml(key: &str, value: &toml::Value) -> Result<u64, ValidationError> {
    match value.as_integer() {
        Some(n) if n > 0 => Ok(n as u64),
        Some(n) => Err(ValidationError::new(format!(
            "Configuration key '{}' must be greater than 0 (got {})",
            key, n
        ))),
        None => Err(ValidationError::new(format!(
            "Configuration key '{}' must be an integer",
            key
        ))),
    }
}

/// Convert a TOML integer of milliseconds into a `Duration`
pub fn period_from_toml(key: &str, value: &toml::Value) -> Result<Duration, ValidationError> {
    match value.as_integer() {
        Some(ms) if ms >= 0 => Ok(Duration::from_millis(ms as u64)),
        Some(ms) => Err(ValidationError::new(format!(
            "Configuration key '{}' cannot be negative (got {})",
            key, ms
        ))),
        None => Err(ValidationError::new(format!(
            "Configuration key '{}' must be an integer number of milliseconds",
            key
        ))),
    }
}
