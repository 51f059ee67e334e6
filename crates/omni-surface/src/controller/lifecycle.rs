use omni_common::{ConnectionId, SurfaceError, SurfaceId};
use tracing::{debug, error, info, warn};

use super::SurfaceController;
use crate::native::{EventSink, NativeSurface, SurfaceHost, SurfaceSpec};
use crate::partition::Partition;
use crate::registry::RegistryEntry;

impl<H: SurfaceHost> SurfaceController<H> {
    /// Allocate a surface for `id` in `owner`'s window.
    ///
    /// A second `create` for a live id is a no-op. Fails with
    /// [`SurfaceError::Attach`] when the window cannot be resolved or the
    /// host refuses the surface; nothing is registered in that case.
    pub fn create(
        &mut self,
        owner: ConnectionId,
        id: SurfaceId,
        partition: Partition,
    ) -> Result<(), SurfaceError> {
        if self.registry.contains(&id) {
            debug!(surface_id = %id, "create ignored: surface already exists");
            return Ok(());
        }

        let Some(window) = self.host.resolve_window(owner) else {
            error!(surface_id = %id, connection = %owner, "cannot attach surface: no window");
            return Err(SurfaceError::Attach {
                id: id.to_string(),
                reason: "connection has no window".into(),
            });
        };

        let spec = SurfaceSpec {
            id: id.clone(),
            partition: partition.clone(),
        };
        let mut surface = self.host.create_surface(window, &spec).map_err(|e| {
            error!(surface_id = %id, %window, error = %e, "native surface allocation failed");
            SurfaceError::Attach {
                id: id.to_string(),
                reason: e.to_string(),
            }
        })?;

        let disposer = surface.listen(EventSink::new(id.clone(), self.sender.clone()));
        let mut entry = RegistryEntry::new(id.clone(), surface, owner, window, partition);
        entry.disposers.push(disposer);
        entry.last_known_url = entry.surface.current_url();
        entry.last_known_title = entry.surface.title();

        if let Err(rejected) = self.registry.put(entry) {
            warn!(surface_id = %id, "registry already held id; releasing duplicate");
            teardown(rejected);
            return Ok(());
        }

        if let Some(entry) = self.registry.get_mut(&id) {
            info!(
                surface_id = %id,
                connection = %owner,
                %window,
                partition = %entry.partition,
                "surface created"
            );
            super::navigation::publish_page_info(&self.relay, entry);
        }
        Ok(())
    }

    /// Tear down `id`: restore input, detach, dispose listeners, release,
    /// and only then drop the registry entry. Returns `false` for an
    /// unknown id.
    pub fn destroy(&mut self, id: &SurfaceId) -> bool {
        let Some(entry) = self.registry.get_mut(id) else {
            debug!(surface_id = %id, "destroy ignored: unknown surface");
            return false;
        };

        if entry.ignore_mouse {
            if let Err(e) = entry.surface.set_ignore_mouse_events(false, false) {
                warn!(surface_id = %id, error = %e, "failed to restore mouse input");
            }
            entry.ignore_mouse = false;
        }
        if let Err(e) = entry.surface.detach() {
            warn!(surface_id = %id, error = %e, "failed to detach surface");
        }
        for disposer in entry.disposers.drain(..) {
            disposer.dispose();
        }
        entry.pending_load = None;
        entry.surface.release();

        self.registry.remove(id);
        info!(surface_id = %id, "surface destroyed");
        true
    }

    /// Destroy every remaining surface.
    pub fn shutdown(&mut self) -> usize {
        let ids = self.registry.ids();
        let count = ids.len();
        for id in &ids {
            self.destroy(id);
        }
        info!(count, "surface controller shut down");
        count
    }
}

/// Release an entry that never made it into the registry.
fn teardown<S: NativeSurface>(mut entry: RegistryEntry<S>) {
    let _ = entry.surface.detach();
    for disposer in entry.disposers.drain(..) {
        disposer.dispose();
    }
    entry.surface.release();
}
