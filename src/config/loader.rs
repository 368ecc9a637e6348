//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::GuardConfig;
use crate::config::validation::validate_config;
use crate::error::ConfigError;
use crate::validation::Schema;

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GuardConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<GuardConfig, ConfigError> {
    let config: GuardConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load a config file and build its header schema in one step.
pub fn load_schema(path: &Path) -> Result<(GuardConfig, Schema), ConfigError> {
    let config = load_config(path)?;
    let schema = config.build_schema()?;
    Ok((config, schema))
}
