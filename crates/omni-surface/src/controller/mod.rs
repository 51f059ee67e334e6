//! Surface lifecycle controller.
//!
//! Owns the registry and runs every operation as one uninterrupted step:
//! - `lifecycle`: create, destroy, shutdown
//! - `navigation`: load, load settlement, native navigation events
//! - `input`: bounds and mouse passthrough
//!
//! Operations on unknown ids are logged no-ops. Only `create` can fail.

mod input;
mod lifecycle;
mod navigation;

use omni_common::{ConnectionId, SurfaceId};

use crate::events::PageInfo;
use crate::native::SurfaceHost;
use crate::queue::InboundSender;
use crate::registry::SurfaceRegistry;
use crate::relay::EventRelay;

pub struct SurfaceController<H: SurfaceHost> {
    host: H,
    registry: SurfaceRegistry<H::Surface>,
    relay: EventRelay,
    /// Cloned into each surface's event sink.
    sender: InboundSender,
    next_ticket: u64,
}

impl<H: SurfaceHost> SurfaceController<H> {
    pub fn new(host: H, relay: EventRelay, sender: InboundSender) -> Self {
        Self {
            host,
            registry: SurfaceRegistry::new(),
            relay,
            sender,
            next_ticket: 0,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn registry(&self) -> &SurfaceRegistry<H::Surface> {
        &self.registry
    }

    pub fn relay(&self) -> &EventRelay {
        &self.relay
    }

    pub fn contains(&self, id: &SurfaceId) -> bool {
        self.registry.contains(id)
    }

    pub fn owner_of(&self, id: &SurfaceId) -> Option<ConnectionId> {
        self.registry.get(id).map(|e| e.owner())
    }

    /// Cached page info for late subscribers. `None` while blank.
    pub fn page_info(&self, id: &SurfaceId) -> Option<PageInfo> {
        self.registry.get(id).and_then(|e| e.page_info())
    }

    pub fn is_loading(&self, id: &SurfaceId) -> bool {
        self.registry.get(id).is_some_and(|e| e.is_loading())
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }
}
