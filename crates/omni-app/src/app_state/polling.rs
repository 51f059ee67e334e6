//! Pump the surface service and schedule the next wake-up.

use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

use winit::event_loop::{ActiveEventLoop, ControlFlow};

use super::core::OmniApp;

/// Idle wake-up interval when no bounds flush is pending.
pub(super) const POLL_INTERVAL: Duration = Duration::from_millis(16);

impl OmniApp {
    /// Run one service step and schedule the next wake-up.
    pub(super) fn poll_and_schedule(&mut self, event_loop: &ActiveEventLoop) {
        if self.close_requested.swap(false, Ordering::SeqCst) {
            self.shutdown();
            self.should_exit = true;
            event_loop.exit();
            return;
        }

        let now = Instant::now();
        self.poll_service(now);

        let deadline = self.service.as_ref().and_then(|s| s.next_deadline());
        event_loop.set_control_flow(ControlFlow::WaitUntil(next_wake(now, deadline)));
    }

    fn poll_service(&mut self, now: Instant) {
        let (Some(service), Some(host_ui)) = (self.service.as_mut(), self.host_ui.as_mut()) else {
            return;
        };

        if host_ui.take_reload() {
            let dropped = service.disconnect(host_ui.connection());
            tracing::info!(dropped, "host UI reloaded, surfaces released");
        }

        let handled = service.pump(now);
        if handled > 0 {
            tracing::trace!(handled, "service pumped");
        }
        for outbound in service.drain_outbound() {
            host_ui.deliver(&outbound);
        }
    }
}

/// Wake for the earlier of the idle interval and the next bounds flush.
pub(super) fn next_wake(now: Instant, deadline: Option<Instant>) -> Instant {
    let idle = now + POLL_INTERVAL;
    deadline.map_or(idle, |d| d.min(idle))
}
