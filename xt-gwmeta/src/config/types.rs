//! Configuration types for xt-gwmeta
//!
//! Configuration is loaded from JSON files and validated before use. Every
//! section is optional; an empty object yields the defaults.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::target::{Family, RenderMode};

/// Log levels accepted by `log.level`.
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,

    /// Output rendering configuration
    #[serde(default)]
    pub render: RenderConfig,
}

impl Config {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.log.validate()
    }

    /// Create the default configuration
    #[must_use]
    pub fn default_config() -> Self {
        Self::default()
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: "json" or "text"
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Include target (module path)
    #[serde(default)]
    pub target: bool,
}

impl LogConfig {
    /// Validate logging configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` for an unknown level or format.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "Unknown log level: {}",
                self.level
            )));
        }

        if self.format != "json" && self.format != "text" {
            return Err(ConfigError::ValidationError(format!(
                "log format must be 'json' or 'text': {}",
                self.format
            )));
        }

        Ok(())
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            target: false,
        }
    }
}

/// Output rendering configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RenderConfig {
    /// Form used when a command does not ask for one explicitly
    #[serde(default)]
    pub mode: RenderMode,

    /// Prefix save output with `-j GWMETA`
    #[serde(default)]
    pub with_target: bool,

    /// Address family whose registration entry drives parsing
    #[serde(default = "default_family")]
    pub family: Family,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            mode: RenderMode::default(),
            with_target: false,
            family: default_family(),
        }
    }
}

fn default_log_level() -> String {
    "warn".into()
}

fn default_log_format() -> String {
    "text".into()
}

const fn default_family() -> Family {
    Family::Ipv4
}
