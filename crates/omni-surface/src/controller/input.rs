use omni_common::{Bounds, SurfaceId};
use tracing::{debug, warn};

use super::SurfaceController;
use crate::native::{NativeSurface, SurfaceHost};

impl<H: SurfaceHost> SurfaceController<H> {
    /// Reposition `id`. Fire-and-forget: native errors are logged, unknown
    /// ids are ignored.
    pub fn set_bounds(&mut self, id: &SurfaceId, bounds: Bounds) -> bool {
        let Some(entry) = self.registry.get_mut(id) else {
            debug!(surface_id = %id, "set_bounds ignored: unknown surface");
            return false;
        };
        if let Err(e) = entry.surface.set_bounds(bounds) {
            warn!(surface_id = %id, ?bounds, error = %e, "failed to apply bounds");
            return false;
        }
        entry.bounds = Some(bounds);
        true
    }

    /// Toggle whether `id` consumes pointer input. With `ignore` set and
    /// `forward` set, mouse moves still reach the page for hover effects.
    pub fn set_ignore_mouse_events(&mut self, id: &SurfaceId, ignore: bool, forward: bool) -> bool {
        let Some(entry) = self.registry.get_mut(id) else {
            debug!(surface_id = %id, "set_ignore_mouse_events ignored: unknown surface");
            return false;
        };
        if let Err(e) = entry.surface.set_ignore_mouse_events(ignore, forward && ignore) {
            warn!(surface_id = %id, ignore, error = %e, "failed to toggle mouse passthrough");
            return false;
        }
        debug!(surface_id = %id, ignore, forward, "mouse passthrough");
        entry.ignore_mouse = ignore;
        true
    }
}
