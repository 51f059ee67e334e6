//! Fixed chrome geometry around the embedded surfaces.

use serde::{Deserialize, Serialize};

/// Sizes of the fixed chrome that the placeholder's own position does not
/// account for. Passed to the bounds synchronizer as offsets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Sidebar width in pixels (left offset).
    pub sidebar_width: u32,
    /// Custom titlebar/header height in pixels (top offset).
    pub header_height: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            sidebar_width: 260,
            header_height: 48,
        }
    }
}
