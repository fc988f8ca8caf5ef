//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ProjectConfig;
use std::path::Path;

/// Loads and validates a `rampack.toml` configuration from a project directory.
///
/// Reads `<project_dir>/rampack.toml`, parses it, and validates field consistency.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    let config_path = project_dir.join("rampack.toml");
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `rampack.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that configuration values are consistent.
fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.bundle.split && config.bundle.output.as_deref().map_or(true, str::is_empty) {
        return Err(ConfigError::ValidationError(
            "split mode requires bundle.output to be set".to_string(),
        ));
    }
    if config.bundle.remove_entry && config.bundle.entry_point.is_none() {
        return Err(ConfigError::ValidationError(
            "bundle.remove_entry requires bundle.entry_point".to_string(),
        ));
    }
    Ok(())
}
