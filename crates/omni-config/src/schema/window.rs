//! Window configuration types.

use serde::{Deserialize, Serialize};

/// Main window appearance and sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Initial inner width in logical pixels.
    pub width: u32,
    /// Initial inner height in logical pixels.
    pub height: u32,
    pub min_width: u32,
    pub min_height: u32,
    /// Window background color as `#rrggbb`, visible before the host UI paints.
    pub background: String,
    /// Draw our own chrome instead of OS decorations.
    pub frameless: bool,
    /// Keep the window hidden until the host UI reports it is ready.
    pub start_hidden: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Omni".into(),
            width: 1200,
            height: 780,
            min_width: 960,
            min_height: 640,
            background: "#020617".into(),
            frameless: true,
            start_hidden: true,
        }
    }
}
