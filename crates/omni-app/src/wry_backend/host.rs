//! `SurfaceHost` backed by winit windows and wry web contexts.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use omni_common::{ConnectionId, WindowId};
use omni_surface::{NativeError, Partition, SurfaceHost, SurfaceSpec};
use tracing::{debug, info, warn};
use winit::window::Window;
use wry::{WebContext, WebViewBuilder};

use super::surface::{SurfaceOptions, WrySurface};

/// Where partition storage lives on disk.
#[derive(Debug, Clone)]
pub struct PartitionRoots {
    pub persistent: PathBuf,
    /// Removed by [`WryHost::cleanup`].
    pub ephemeral: PathBuf,
}

impl PartitionRoots {
    /// Platform locations, falling back to the ephemeral root when no data
    /// directory can be resolved.
    pub fn from_platform() -> Self {
        let ephemeral = omni_config::paths::ephemeral_partitions_dir();
        let persistent = omni_config::paths::partitions_dir().unwrap_or_else(|e| {
            warn!(error = %e, "no data directory, persistent partitions will not survive restart");
            ephemeral.join("persist")
        });
        Self {
            persistent,
            ephemeral,
        }
    }

    /// Storage directory for `partition`, or `None` for the engine default.
    pub fn storage_dir(&self, partition: &Partition) -> Option<PathBuf> {
        let name = partition.storage_dir_name()?;
        let root = if partition.is_persistent() {
            &self.persistent
        } else {
            &self.ephemeral
        };
        Some(root.join(name))
    }
}

pub struct WryHost {
    windows: HashMap<WindowId, Arc<Window>>,
    connections: HashMap<ConnectionId, WindowId>,
    /// One context per distinct partition, alive as long as the host.
    contexts: HashMap<Partition, WebContext>,
    roots: PartitionRoots,
    options: SurfaceOptions,
    next_window: u32,
}

impl WryHost {
    pub fn new(roots: PartitionRoots, options: SurfaceOptions) -> Self {
        Self {
            windows: HashMap::new(),
            connections: HashMap::new(),
            contexts: HashMap::new(),
            roots,
            options,
            next_window: 1,
        }
    }

    pub fn add_window(&mut self, window: Arc<Window>) -> WindowId {
        let id = WindowId(self.next_window);
        self.next_window += 1;
        self.windows.insert(id, window);
        id
    }

    /// Route surfaces created by `connection` into `window`.
    pub fn bind_connection(&mut self, connection: ConnectionId, window: WindowId) {
        self.connections.insert(connection, window);
    }

    /// Drop every web context and remove ephemeral partition storage.
    /// Call after all surfaces are released.
    pub fn cleanup(&mut self) {
        self.contexts.clear();
        remove_dir_if_present(&self.roots.ephemeral);
    }

    fn context_for(&mut self, partition: &Partition) -> Result<Option<&mut WebContext>, NativeError> {
        let Some(dir) = self.roots.storage_dir(partition) else {
            return Ok(None);
        };
        if !self.contexts.contains_key(partition) {
            std::fs::create_dir_all(&dir).map_err(|e| {
                NativeError::Backend(format!("partition storage {}: {e}", dir.display()))
            })?;
            debug!(%partition, dir = %dir.display(), "web context created");
        }
        Ok(Some(
            self.contexts
                .entry(partition.clone())
                .or_insert_with(|| WebContext::new(Some(dir))),
        ))
    }
}

impl SurfaceHost for WryHost {
    type Surface = WrySurface;

    fn resolve_window(&self, connection: ConnectionId) -> Option<WindowId> {
        self.connections
            .get(&connection)
            .copied()
            .filter(|w| self.windows.contains_key(w))
    }

    fn create_surface(
        &mut self,
        window: WindowId,
        spec: &SurfaceSpec,
    ) -> Result<WrySurface, NativeError> {
        let parent = self
            .windows
            .get(&window)
            .cloned()
            .ok_or_else(|| NativeError::Backend(format!("{window} is gone")))?;
        let options = self.options.clone();

        let builder = match self.context_for(&spec.partition)? {
            Some(context) => WebViewBuilder::with_web_context(context),
            None => WebViewBuilder::new(),
        };
        WrySurface::build(spec.id.clone(), builder, parent.as_ref(), &options)
    }
}

fn remove_dir_if_present(dir: &Path) {
    match std::fs::remove_dir_all(dir) {
        Ok(()) => info!(dir = %dir.display(), "ephemeral partitions removed"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(dir = %dir.display(), error = %e, "failed to remove ephemeral partitions"),
    }
}
