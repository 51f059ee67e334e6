//! Full configuration validation.
//!
//! Each check pushes onto a shared error list; the orchestrator folds them
//! into a single `ConfigError`.

mod helpers;

#[cfg(test)]
mod tests;

use omni_common::ConfigError;

use crate::schema::OmniConfig;
use helpers::{validate_hex_color, validate_range, validate_range_u64};

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &OmniConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_window(&mut errors, config);
    validate_layout(&mut errors, config);
    validate_surfaces(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_window(errors: &mut Vec<String>, config: &OmniConfig) {
    let w = &config.window;
    validate_range(errors, "window.width", w.width, 1, 16384);
    validate_range(errors, "window.height", w.height, 1, 16384);
    if w.min_width > w.width {
        errors.push(format!(
            "window.min_width = {} exceeds window.width = {}",
            w.min_width, w.width
        ));
    }
    if w.min_height > w.height {
        errors.push(format!(
            "window.min_height = {} exceeds window.height = {}",
            w.min_height, w.height
        ));
    }
    validate_hex_color(errors, "window.background", &w.background);
}

fn validate_layout(errors: &mut Vec<String>, config: &OmniConfig) {
    validate_range(errors, "layout.sidebar_width", config.layout.sidebar_width, 0, 4096);
    validate_range(errors, "layout.header_height", config.layout.header_height, 0, 1024);
}

fn validate_surfaces(errors: &mut Vec<String>, config: &OmniConfig) {
    let s = &config.surfaces;
    validate_range_u64(errors, "surfaces.bounds_debounce_ms", s.bounds_debounce_ms, 1, 250);
    if s.default_url.trim().is_empty() {
        errors.push("surfaces.default_url must not be empty".into());
    }
    if let Some(p) = &s.default_partition {
        if p.trim().is_empty() {
            errors.push("surfaces.default_partition must not be blank when set".into());
        }
    }
}
