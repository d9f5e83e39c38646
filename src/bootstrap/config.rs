//! # Configuration Loader
//!
//! Reads `config.toml` and maps it onto the [`AppConfig`] DTO. Pure data
//! loading: defaults for missing keys live in the DTO, not here.

use std::path::Path;

use anyhow::Context;
use tracing::debug;

use cg_core::config::AppConfig;

/// Load configuration from a TOML file.
///
/// # Errors
///
/// - the file cannot be read
/// - the content is not valid TOML
pub fn load_config(config_path: &Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    AppConfig::from_toml(&toml_value)
}

/// The config file is optional; a missing file means all defaults.
pub fn load_config_or_default(config_path: &Path) -> anyhow::Result<AppConfig> {
    if !config_path.exists() {
        debug!(path = %config_path.display(), "no config file, using defaults");
        return Ok(AppConfig::default());
    }
    load_config(config_path)
}
