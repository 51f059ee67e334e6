//! Top-level application state.
//!
//! Implements `winit::application::ApplicationHandler` to drive the main
//! event loop. Owns the window, the host-UI webview and the surface
//! service, and pumps the service between OS events.

mod core;
mod event_handler;
mod init;
mod polling;
mod shell;
mod shutdown;

pub use core::OmniApp;
