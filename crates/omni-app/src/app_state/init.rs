//! Window creation, host-UI webview and surface service setup.

use std::sync::Arc;
use std::time::Duration;

use omni_common::new_connection_id;
use omni_config::OmniConfig;
use omni_surface::{ContentProvider, Placement, ServiceSettings, SurfaceService};
use winit::dpi::LogicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::WindowAttributes;

use crate::wry_backend::{HostUi, PartitionRoots, ShellPageConfig, SurfaceOptions, WryHost};

use super::core::OmniApp;
use super::shell::WindowShell;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Relative path from the working directory to the bundled host UI.
const SHELL_DIR: &str = "assets/shell";

const FALLBACK_BACKGROUND: (u8, u8, u8, u8) = (2, 6, 23, 255);

// =============================================================================
// INITIALIZATION
// =============================================================================

impl OmniApp {
    /// Create the window, the surface service and the host-UI webview.
    /// Returns `false` if initialization failed and the event loop should exit.
    pub(super) fn initialize_window(&mut self, event_loop: &ActiveEventLoop) -> bool {
        let window = match event_loop.create_window(window_attributes(&self.config)) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                tracing::error!("Failed to create window: {e}");
                return false;
            }
        };

        let surfaces = &self.config.surfaces;
        let mut host = WryHost::new(
            PartitionRoots::from_platform(),
            SurfaceOptions {
                user_agent: surfaces.user_agent.clone(),
                devtools: surfaces.devtools || cfg!(debug_assertions),
            },
        );
        let window_id = host.add_window(Arc::clone(&window));
        let connection = new_connection_id();
        host.bind_connection(connection, window_id);

        let shell = WindowShell::new(
            Arc::clone(&window),
            self.log.clone(),
            Arc::clone(&self.close_requested),
        );
        let service = SurfaceService::new(host, shell, service_settings(&self.config));

        let shell_path = std::env::current_dir().unwrap_or_default().join(SHELL_DIR);
        if !shell_path.is_dir() {
            tracing::warn!(
                path = %shell_path.display(),
                "Shell directory not found, the host UI will be blank"
            );
        }

        let page = ShellPageConfig {
            start_url: self.start_url.clone(),
            sidebar_width: self.config.layout.sidebar_width,
            header_height: self.config.layout.header_height,
            background: parse_hex_color(&self.config.window.background)
                .unwrap_or(FALLBACK_BACKGROUND),
            devtools: self.config.surfaces.devtools || cfg!(debug_assertions),
        };
        let host_ui = match HostUi::build(
            &window,
            ContentProvider::new(&shell_path),
            service.sender(),
            connection,
            &page,
        ) {
            Ok(ui) => ui,
            Err(e) => {
                tracing::error!("Failed to create host UI webview: {e}");
                return false;
            }
        };

        tracing::info!(
            %connection,
            shell_dir = %shell_path.display(),
            "Window created and host UI attached"
        );
        self.host_ui = Some(host_ui);
        self.service = Some(service);
        self.window = Some(window);
        true
    }
}

pub(super) fn window_attributes(config: &OmniConfig) -> WindowAttributes {
    let window = &config.window;
    WindowAttributes::default()
        .with_title(window.title.clone())
        .with_inner_size(LogicalSize::new(window.width as f64, window.height as f64))
        .with_min_inner_size(LogicalSize::new(
            window.min_width as f64,
            window.min_height as f64,
        ))
        .with_decorations(!window.frameless)
        .with_visible(!window.start_hidden)
}

pub(super) fn service_settings(config: &OmniConfig) -> ServiceSettings {
    ServiceSettings {
        default_partition: config.surfaces.default_partition.clone(),
        debounce: Duration::from_millis(config.surfaces.bounds_debounce_ms),
        forward_mouse_moves: config.surfaces.forward_mouse_moves,
        placement: Placement::new(
            config.layout.sidebar_width as i32,
            config.layout.header_height as i32,
        ),
        debug_ui_toggle: config.logging.debug_ui_toggle,
    }
}

/// `#rrggbb` to opaque RGBA.
pub(super) fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?, 255))
}
