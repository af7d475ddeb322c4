//! Configuration loading and management
//!
//! This module handles loading configuration from files and environment variables.

use std::path::Path;

use tracing::debug;

use super::types::Config;
use crate::error::ConfigError;
use crate::target::RenderMode;

/// Load configuration from a JSON file
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read or parsed.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();

    debug!("Loading configuration from {:?}", path);

    if !path.exists() {
        return Err(ConfigError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let contents = std::fs::read_to_string(path)?;

    let config: Config = serde_json::from_str(&contents).map_err(|e| {
        ConfigError::ParseError(format!("Failed to parse JSON: {e} at {path:?}"))
    })?;

    config.validate()?;

    Ok(config)
}

/// Load configuration from a JSON string
///
/// # Errors
///
/// Returns `ConfigError` if parsing or validation fails.
pub fn load_config_str(json: &str) -> Result<Config, ConfigError> {
    let config: Config =
        serde_json::from_str(json).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    config.validate()?;

    Ok(config)
}

/// Load configuration with environment variable overrides
///
/// A missing `path` falls back to the defaults before overrides apply.
///
/// Environment variables:
/// - `XT_GWMETA_LOG_LEVEL`: Override log level
/// - `XT_GWMETA_LOG_FORMAT`: Override log format
/// - `XT_GWMETA_RENDER_MODE`: Override default render mode (print, save)
///
/// # Errors
///
/// Returns `ConfigError` if loading, parsing or an override fails.
pub fn load_config_with_env(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => Config::default_config(),
    };

    if let Ok(level) = std::env::var("XT_GWMETA_LOG_LEVEL") {
        config.log.level = level;
        debug!("Log level overridden to {}", config.log.level);
    }

    if let Ok(format) = std::env::var("XT_GWMETA_LOG_FORMAT") {
        config.log.format = format;
        debug!("Log format overridden to {}", config.log.format);
    }

    if let Ok(mode) = std::env::var("XT_GWMETA_RENDER_MODE") {
        config.render.mode = mode
            .parse::<RenderMode>()
            .map_err(|reason| ConfigError::EnvError {
                name: "XT_GWMETA_RENDER_MODE".into(),
                reason,
            })?;
        debug!("Render mode overridden to {}", config.render.mode);
    }

    // Re-validate after overrides
    config.validate()?;

    Ok(config)
}

/// Create a default configuration file at the given path
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be written.
pub fn create_default_config(path: impl AsRef<Path>) -> Result<(), ConfigError> {
    let config = Config::default_config();
    let json = serde_json::to_string_pretty(&config)
        .map_err(|e| ConfigError::ParseError(format!("Failed to serialize config: {e}")))?;

    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_config() {
        let file = create_temp_config(r#"{ "log": { "level": "debug" } }"#);
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.log.level, "debug");
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config("/nonexistent/path/config.json");
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn test_load_config_str() {
        let config = load_config_str(r#"{ "render": { "mode": "save" } }"#).unwrap();
        assert_eq!(config.render.mode, RenderMode::Save);
    }

    #[test]
    fn test_load_config_invalid_json() {
        let result = load_config_str("not valid json");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_config_rejects_invalid_values() {
        let file = create_temp_config(r#"{ "log": { "format": "yaml" } }"#);
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_create_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        create_default_config(&path).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config, Config::default_config());
    }
}
