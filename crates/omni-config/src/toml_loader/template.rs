//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Omni Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[window]
# title = "Omni"
# width = 1200
# height = 780
# min_width = 960
# min_height = 640
# background = "#020617"
# frameless = true
# start_hidden = true

[layout]
# sidebar_width = 260     # left offset of embedded surfaces
# header_height = 48      # top offset of embedded surfaces

[surfaces]
# default_url = "https://www.google.com"
# bounds_debounce_ms = 16 # 1-250
# default_partition = "persist:main"
# forward_mouse_moves = true
# user_agent = "Omni/0.1"

[logging]
# level = "info"          # debug, info, warn, error
# debug_ui_toggle = true
"##
    .to_string()
}
