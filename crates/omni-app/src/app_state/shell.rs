//! Window chrome and app controls requested by the host UI.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use omni_surface::ShellControls;
use tracing::{debug, info, warn};
use winit::window::Window;

use crate::logging::LogControl;

pub struct WindowShell {
    window: Arc<Window>,
    log: Option<LogControl>,
    close_requested: Arc<AtomicBool>,
}

impl WindowShell {
    pub(super) fn new(
        window: Arc<Window>,
        log: Option<LogControl>,
        close_requested: Arc<AtomicBool>,
    ) -> Self {
        Self {
            window,
            log,
            close_requested,
        }
    }
}

impl ShellControls for WindowShell {
    fn minimize(&mut self) {
        self.window.set_minimized(true);
    }

    fn toggle_maximize(&mut self) {
        let maximized = !self.window.is_maximized();
        debug!(maximized, "toggling maximize");
        self.window.set_maximized(maximized);
    }

    fn close(&mut self) {
        info!("close requested by host UI");
        self.close_requested.store(true, Ordering::SeqCst);
    }

    fn is_maximized(&self) -> bool {
        self.window.is_maximized()
    }

    fn start_drag(&mut self) {
        if let Err(e) = self.window.drag_window() {
            warn!(error = %e, "window drag failed");
        }
    }

    fn show(&mut self) {
        if !self.window.is_visible().unwrap_or(false) {
            info!("host UI ready, showing window");
            self.window.set_visible(true);
            self.window.focus_window();
        }
    }

    fn set_debug_logging(&mut self, enabled: bool) -> bool {
        match &self.log {
            Some(log) => log.set_debug(enabled),
            None => false,
        }
    }

    fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }
}
