//! Configuration schema types for Omni.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod layout;
mod logging;
mod surfaces;
mod window;

pub use layout::*;
pub use logging::*;
pub use surfaces::*;
pub use window::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for Omni.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct OmniConfig {
    pub window: WindowConfig,
    pub layout: LayoutConfig,
    pub surfaces: SurfacesConfig,
    pub logging: LoggingConfig,
}

// =============================================================================
// Tests
// =============================================================================
