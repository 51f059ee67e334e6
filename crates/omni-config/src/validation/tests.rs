use super::*;

#[test]
fn default_config_is_valid() {
    assert!(validate(&OmniConfig::default()).is_ok());
}

#[test]
fn zero_debounce_is_rejected() {
    let mut config = OmniConfig::default();
    config.surfaces.bounds_debounce_ms = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("surfaces.bounds_debounce_ms"));
}

#[test]
fn min_size_larger_than_size_is_rejected() {
    let mut config = OmniConfig::default();
    config.window.min_width = 2000;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("window.min_width"));
}

#[test]
fn bad_background_color_is_rejected() {
    let mut config = OmniConfig::default();
    config.window.background = "slate".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("window.background"));

    config.window.background = "#02061z".into();
    assert!(validate(&config).is_err());
}

#[test]
fn errors_are_collected_not_short_circuited() {
    let mut config = OmniConfig::default();
    config.window.width = 0;
    config.surfaces.default_url = "  ".into();
    config.surfaces.default_partition = Some(String::new());
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("window.width"));
    assert!(err.contains("surfaces.default_url"));
    assert!(err.contains("surfaces.default_partition"));
}
