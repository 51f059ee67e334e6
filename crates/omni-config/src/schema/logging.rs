//! Logging configuration.

use serde::{Deserialize, Serialize};

/// Log level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// `EnvFilter` directive for the omni crates at this level.
    pub fn directive(self) -> &'static str {
        match self {
            Self::Debug => "omni=debug",
            Self::Info => "omni=info",
            Self::Warn => "omni=warn",
            Self::Error => "omni=error",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    /// Let the host UI switch debug logging on and off at runtime.
    pub debug_ui_toggle: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            debug_ui_toggle: true,
        }
    }
}
