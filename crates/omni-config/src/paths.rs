//! Platform directory resolution.

use std::path::PathBuf;

use omni_common::ConfigError;

const APP_DIR: &str = "omni";

/// `<config_dir>/omni`
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|d| d.join(APP_DIR))
        .ok_or_else(|| ConfigError::ParseError("could not determine config directory".into()))
}

/// `<config_dir>/omni/config.toml`
pub fn config_file() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// `<data_dir>/omni`
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    dirs::data_dir()
        .map(|d| d.join(APP_DIR))
        .ok_or_else(|| ConfigError::ParseError("could not determine data directory".into()))
}

/// Root for persistent surface partitions (`persist:<name>`).
pub fn partitions_dir() -> Result<PathBuf, ConfigError> {
    Ok(data_dir()?.join("partitions"))
}

/// Per-process root for ephemeral partitions. Removed at shutdown.
pub fn ephemeral_partitions_dir() -> PathBuf {
    std::env::temp_dir().join(format!("{APP_DIR}-{}", std::process::id()))
}
