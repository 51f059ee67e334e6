//! Graceful shutdown: release surfaces, drop partitions, close the window.

use super::core::OmniApp;

// =============================================================================
// SHUTDOWN
// =============================================================================

impl OmniApp {
    /// Perform graceful shutdown of all subsystems.
    ///
    /// Order matters:
    /// 1. Destroy every surface (restores input, detaches, releases)
    /// 2. Drop web contexts and remove ephemeral partition storage
    /// 3. Drop the host-UI webview
    /// 4. Drop the window
    pub(super) fn shutdown(&mut self) {
        tracing::info!("Initiating graceful shutdown");

        // 1. Destroy every surface
        if let Some(mut service) = self.service.take() {
            let remaining = service.shutdown();
            if remaining > 0 {
                tracing::warn!(remaining, "surfaces left after shutdown");
            }

            // 2. Partition storage
            service.controller_mut().host_mut().cleanup();
        }

        // 3. Host UI
        self.host_ui = None;

        // 4. Window
        self.window = None;

        tracing::info!("Graceful shutdown complete");
    }
}

// =============================================================================
// TESTS
// =============================================================================
