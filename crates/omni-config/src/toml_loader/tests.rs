//! Tests for TOML config loading and creation.

use super::*;
use std::path::Path;

#[test]
fn load_from_nonexistent_returns_parse_error() {
    let result = load_from_path(Path::new("/tmp/nonexistent_omni_config.toml"));
    assert!(matches!(result, Err(omni_common::ConfigError::ParseError(_))));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r##"
[window]
title = "Research"

[surfaces]
default_url = "https://example.com"
"##,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.window.title, "Research");
    assert_eq!(config.surfaces.default_url, "https://example.com");
    // Defaults preserved
    assert_eq!(config.window.width, 1200);
    assert_eq!(config.layout.sidebar_width, 260);
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let result = load_from_path(&path);
    assert!(matches!(result, Err(omni_common::ConfigError::ParseError(_))));
}

#[test]
fn load_with_invalid_values_still_returns_parsed_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[window]\nwidth = 0\n").unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.window.width, 0);
}

#[test]
fn default_template_parses_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");
    create_default_config(&path).unwrap();
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.window.title, "Omni");
    assert_eq!(config.surfaces.bounds_debounce_ms, 16);
    assert!(crate::validation::validate(&config).is_ok());
}
