mod app_state;
mod cli;
mod logging;
mod wry_backend;

use std::path::Path;

use omni_config::OmniConfig;
use winit::event_loop::EventLoop;

use crate::logging::LogControl;

fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        eprintln!("\n--- Omni crashed ---");
        eprintln!("Please report this issue at: https://github.com/omni-shell/omni/issues");
        eprintln!("--------------------\n");

        default_hook(info);
    }));
}

fn load_config(path: Option<&str>) -> OmniConfig {
    let result = match path {
        Some(path) => {
            tracing::info!("Using config override: {path}");
            omni_config::load_config_from(Path::new(path))
        }
        None => omni_config::load_config(),
    };
    result.unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {e}");
        OmniConfig::default()
    })
}

fn main() {
    install_panic_hook();

    let args = cli::parse();

    // Initialize logging; the config level applies once it is loaded
    let mut log = LogControl::init(args.log_level.as_deref().unwrap_or("omni=info"));

    tracing::info!("Omni v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = load_config(args.config.as_deref());
    if args.log_level.is_none() {
        log.set_base(config.logging.level.directive());
    }

    let start_url = args
        .url
        .clone()
        .unwrap_or_else(|| config.surfaces.default_url.clone());
    tracing::info!(url = %start_url, "Config loaded");

    let event_loop = EventLoop::new().expect("failed to create event loop");
    let mut app = app_state::OmniApp::new(config, start_url, Some(log));

    tracing::info!("Entering event loop");
    if let Err(e) = event_loop.run_app(&mut app) {
        tracing::error!("Event loop error: {e}");
    }
    tracing::info!("Shutdown complete");
}
