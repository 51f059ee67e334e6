//! Embedded surface behavior.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfacesConfig {
    /// Page the first surface navigates to.
    pub default_url: String,
    /// Coalescing window for bounds updates (valid range: 1-250).
    pub bounds_debounce_ms: u64,
    /// Partition used when the host UI does not name one.
    pub default_partition: Option<String>,
    /// Keep delivering mouse-move events while input passes through.
    pub forward_mouse_moves: bool,
    pub user_agent: Option<String>,
    /// Allow devtools on surfaces (always on in debug builds).
    pub devtools: bool,
}

impl Default for SurfacesConfig {
    fn default() -> Self {
        Self {
            default_url: "https://www.google.com".into(),
            bounds_debounce_ms: 16,
            default_partition: None,
            forward_mouse_moves: true,
            user_agent: None,
            devtools: cfg!(debug_assertions),
        }
    }
}
