use serde::{Deserialize, Serialize};

/// Absolute surface bounds in device pixels, relative to the window's
/// content area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Zero-area rectangle at the origin. Used to park a surface that must
    /// stay alive while another view is shown.
    pub fn hidden() -> Self {
        Self::default()
    }

    pub fn is_hidden(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A placeholder element's bounding box as measured by the host UI layout.
///
/// Values are raw layout floats and may be fractional, negative (scrolled
/// off-screen) or NaN while the element is detached.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlaceholderRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlaceholderRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}
