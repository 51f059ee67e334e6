//! Core TOML config loading: read from path or platform default.

use std::path::Path;

use omni_common::ConfigError;
use tracing::{info, warn};

use super::template::default_config_toml;
use crate::paths::config_file;
use crate::schema::OmniConfig;
use crate::validation;

/// Load config from a specific TOML file path.
///
/// Missing fields take their serde defaults. A validation failure is logged
/// and the parsed config is returned as-is; callers that need a hard failure
/// validate again themselves.
pub fn load_from_path(path: &Path) -> Result<OmniConfig, ConfigError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("failed to read {}: {e}", path.display())))?;

    let config: OmniConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    if let Err(e) = validation::validate(&config) {
        warn!("config validation warning: {e}");
    }

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load config from the platform-specific default path.
///
/// On Linux: `~/.config/omni/config.toml`
/// On macOS: `~/Library/Application Support/omni/config.toml`
///
/// If the file does not exist, writes the commented default and returns defaults.
pub fn load_default() -> Result<OmniConfig, ConfigError> {
    let path = config_file()?;

    if !path.exists() {
        info!("no config found at {}, creating default", path.display());
        create_default_config(&path)?;
        return Ok(OmniConfig::default());
    }
    load_from_path(&path)
}

/// Write the default TOML config (with documentation comments) to `path`.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ConfigError::ParseError(format!(
                "failed to create config directory {}: {e}",
                parent.display()
            ))
        })?;
    }

    std::fs::write(path, default_config_toml()).map_err(|e| {
        ConfigError::ParseError(format!(
            "failed to write default config to {}: {e}",
            path.display()
        ))
    })?;

    info!("created default config at {}", path.display());
    Ok(())
}
