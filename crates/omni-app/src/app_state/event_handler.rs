//! `ApplicationHandler` implementation for the winit event loop.

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::WindowId;

use super::core::OmniApp;

impl ApplicationHandler for OmniApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if !self.initialize_window(event_loop) {
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Window close requested");
                self.shutdown();
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width > 0 && size.height > 0 {
                    if let Some(ref host_ui) = self.host_ui {
                        host_ui.resize(size);
                    }
                }
                self.sync_maximized();
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.should_exit {
            event_loop.exit();
            return;
        }
        self.poll_and_schedule(event_loop);
    }
}

impl OmniApp {
    /// Publish a maximize transition, if the resize caused one.
    fn sync_maximized(&mut self) {
        let (Some(window), Some(service)) = (self.window.as_ref(), self.service.as_mut()) else {
            return;
        };
        if service.window_maximized_changed(window.is_maximized()) {
            tracing::debug!(maximized = window.is_maximized(), "window maximize changed");
        }
    }
}
