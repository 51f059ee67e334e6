//! Mouse passthrough driven by overlay and active-view signals.
//!
//! A surface ignores pointer input whenever an overlay is drawn above it or
//! it is not the active view. The controller only reports transitions, so
//! the native layer is touched once per change.

use std::collections::HashMap;

use omni_common::SurfaceId;

/// A passthrough change to apply to the native surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassthroughChange {
    pub ignore: bool,
    /// Keep delivering mouse-move events while ignoring clicks.
    pub forward: bool,
}

#[derive(Debug, Clone, Copy, Default)]
struct State {
    overlay_active: bool,
    view_active: bool,
    forced: bool,
}

#[derive(Debug)]
pub struct PassthroughController {
    forward: bool,
    states: HashMap<SurfaceId, State>,
}

impl PassthroughController {
    pub fn new(forward: bool) -> Self {
        Self {
            forward,
            states: HashMap::new(),
        }
    }

    /// Record the latest signals for `id`. Returns the change to apply when
    /// the forced state flips, `None` otherwise.
    pub fn report(
        &mut self,
        id: &SurfaceId,
        overlay_active: bool,
        view_active: bool,
    ) -> Option<PassthroughChange> {
        let state = self.states.entry(id.clone()).or_default();
        state.overlay_active = overlay_active;
        state.view_active = view_active;

        let forced = overlay_active || !view_active;
        if forced == state.forced {
            return None;
        }
        state.forced = forced;
        Some(PassthroughChange {
            ignore: forced,
            forward: forced && self.forward,
        })
    }

    /// Forget `id`. If passthrough was on, returns the change that turns it
    /// back off; apply it before the surface is released.
    pub fn release(&mut self, id: &SurfaceId) -> Option<PassthroughChange> {
        let state = self.states.remove(id)?;
        state.forced.then_some(PassthroughChange {
            ignore: false,
            forward: false,
        })
    }

    pub fn is_forced(&self, id: &SurfaceId) -> bool {
        self.states.get(id).is_some_and(|s| s.forced)
    }
}

impl Default for PassthroughController {
    fn default() -> Self {
        Self::new(true)
    }
}
