//! Omni configuration system.
//!
//! TOML-based configuration for the window shell, the fixed chrome
//! geometry, embedded-surface behavior and logging. All sections use
//! defaults so partial configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use omni_config::{load_config, config_to_json};
//!
//! let config = load_config().expect("failed to load config");
//! let json = config_to_json(&config);
//! println!("{json}");
//! ```

pub mod paths;
pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{OmniConfig, CONFIG_SCHEMA_VERSION};

use std::path::Path;

use omni_common::ConfigError;

/// Load config from the platform default path and validate it.
///
/// Creates a commented default `config.toml` if none exists.
pub fn load_config() -> Result<OmniConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load config from an explicit path (the `--config` override) and validate it.
pub fn load_config_from(path: &Path) -> Result<OmniConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }
    let config = toml_loader::load_from_path(path)?;
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &OmniConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
