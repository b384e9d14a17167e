//! TOML configuration file loading
//!
//! Keys use the same kebab-case names as the long command line options:
//!
//! ```toml
//! capacity = 10
//! tasks = 20
//! consumers = 10
//! period-ms = 100
//! drift-correction = false
//! log-level = "info"
//! log-format = "text"
//! log-file = "none"
//! color = true
//! ```

use crate::core::validation::{period_from_toml, positive_from_toml, ValidationError};
use crate::core::version;
use std::path::{Path, PathBuf};

use super::args::Args;

const KNOWN_KEYS: [&str; 10] = [
    "config-version",
    "capacity",
    "tasks",
    "consumers",
    "period-ms",
    "drift-correction",
    "log-level",
    "log-format",
    "log-file",
    "color",
];

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];
const LOG_FORMATS: [&str; 3] = ["text", "ext", "json"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("The specified configuration file does not exist: {}", .path.display())]
    Missing { path: PathBuf },

    #[error("Error reading configuration file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error parsing configuration file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Error in configuration file {}: {source}", .path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: ValidationError,
    },
}

/// `<config_dir>/Pcqueue/pcqueue.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("Pcqueue").join("pcqueue.toml"))
}

impl Args {
    /// Merge the config file into `self`, returning the path that was used
    ///
    /// An explicit `--config-file` must exist; the default location is only
    /// read when present.
    pub fn load_config_file(&mut self) -> Result<Option<PathBuf>, ConfigError> {
        let path = match &self.config_file {
            Some(path) if !path.exists() => {
                return Err(ConfigError::Missing { path: path.clone() })
            }
            Some(path) => path.clone(),
            None => match default_config_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(None),
            },
        };

        let config = read_config_table(&path)?;
        self.apply_toml_values(&config)
            .map_err(|source| ConfigError::Invalid {
                path: path.clone(),
                source,
            })?;
        Ok(Some(path))
    }

    /// Fill unset options from a parsed config table
    pub fn apply_toml_values(&mut self, config: &toml::Table) -> Result<(), ValidationError> {
        if let Some(key) = config.keys().find(|key| !KNOWN_KEYS.contains(&key.as_str())) {
            return Err(ValidationError::new(format!(
                "Unknown configuration key '{}'",
                key
            )));
        }

        if let Some(value) = config.get("config-version") {
            let expected = i64::from(version::config_version());
            match value.as_integer() {
                Some(found) if found == expected => {}
                _ => {
                    return Err(ValidationError::new(format!(
                        "Unsupported config-version {} (expected {})",
                        value, expected
                    )))
                }
            }
        }

        if let Some(value) = config.get("capacity") {
            let capacity = positive_from_toml("capacity", value)? as usize;
            self.capacity.get_or_insert(capacity);
        }
        if let Some(value) = config.get("tasks") {
            let tasks = positive_from_toml("tasks", value)? as usize;
            self.tasks.get_or_insert(tasks);
        }
        if let Some(value) = config.get("consumers") {
            let consumers = positive_from_toml("consumers", value)? as usize;
            self.consumers.get_or_insert(consumers);
        }
        if let Some(value) = config.get("period-ms") {
            let period = period_from_toml("period-ms", value)?;
            self.period_ms.get_or_insert(period.as_millis() as u64);
        }
        if let Some(value) = config.get("drift-correction") {
            // The flag can only switch it on; the file decides otherwise
            self.drift_correction |= bool_value("drift-correction", value)?;
        }
        if let Some(value) = config.get("color") {
            let color = bool_value("color", value)?;
            self.color.get_or_insert(color);
        }
        if let Some(value) = config.get("log-level") {
            let level = choice_value("log-level", value, &LOG_LEVELS)?;
            self.log_level.get_or_insert(level);
        }
        if let Some(value) = config.get("log-format") {
            let format = choice_value("log-format", value, &LOG_FORMATS)?;
            self.log_format.get_or_insert(format);
        }
        if let Some(value) = config.get("log-file") {
            let log_file = value.as_str().ok_or_else(|| {
                ValidationError::new("Configuration key 'log-file' must be a string")
            })?;
            // "none" is kept so that it still disables file logging later
            self.log_file.get_or_insert_with(|| PathBuf::from(log_file));
        }

        Ok(())
    }
}

fn read_config_table(path: &Path) -> Result<toml::Table, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str::<toml::Table>(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn bool_value(key: &str, value: &toml::Value) -> Result<bool, ValidationError> {
    value.as_bool().ok_or_else(|| {
        ValidationError::new(format!("Configuration key '{}' must be true or false", key))
    })
}

fn choice_value(key: &str, value: &toml::Value, allowed: &[&str]) -> Result<String, ValidationError> {
    match value.as_str() {
        Some(choice) if allowed.contains(&choice) => Ok(choice.to_string()),
        _ => Err(ValidationError::new(format!(
            "Configuration key '{}' must be one of: {}",
            key,
            allowed.join(", ")
        ))),
    }
}
