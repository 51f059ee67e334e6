//! OmniApp struct definition and constructor.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use omni_config::OmniConfig;
use omni_surface::SurfaceService;
use winit::window::Window;

use crate::logging::LogControl;
use crate::wry_backend::{HostUi, WryHost};

use super::shell::WindowShell;

pub(super) type Service = SurfaceService<WryHost, WindowShell>;

/// Top-level application state.
pub struct OmniApp {
    pub(super) config: OmniConfig,
    /// Page the host UI opens in its first surface.
    pub(super) start_url: String,
    pub(super) log: Option<LogControl>,

    // Windowing
    pub(super) window: Option<Arc<Window>>,
    pub(super) host_ui: Option<HostUi>,
    pub(super) service: Option<Service>,

    /// Set by `window:close`; handled on the next poll.
    pub(super) close_requested: Arc<AtomicBool>,
    pub(super) should_exit: bool,
}

impl OmniApp {
    pub fn new(config: OmniConfig, start_url: String, log: Option<LogControl>) -> Self {
        Self {
            config,
            start_url,
            log,
            window: None,
            host_ui: None,
            service: None,
            close_requested: Arc::new(AtomicBool::new(false)),
            should_exit: false,
        }
    }
}
