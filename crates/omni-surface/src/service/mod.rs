//! Message-driven facade over the surface core.
//!
//! `SurfaceService` drains the inbound queue, routes host-UI requests to
//! the controller, bounds synchronizer and passthrough controller, and
//! collects replies and relayed events in an outbox addressed per
//! connection. The embedder calls [`SurfaceService::pump`] from its event
//! loop and delivers [`SurfaceService::drain_outbound`] to the host UI.

mod routing;

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use omni_common::{ConnectionId, SurfaceId};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::bounds::{BoundsSynchronizer, Placement, DEFAULT_DEBOUNCE};
use crate::controller::SurfaceController;
use crate::ipc::{HostMessage, Outbound};
use crate::native::SurfaceHost;
use crate::passthrough::PassthroughController;
use crate::queue::{Inbound, InboundSender};
use crate::relay::{EventRelay, Subscription};

/// Window chrome and application controls, provided by the embedder.
pub trait ShellControls {
    fn minimize(&mut self);
    fn toggle_maximize(&mut self);
    fn close(&mut self);
    fn is_maximized(&self) -> bool;
    /// Begin a native window drag (frameless drag regions).
    fn start_drag(&mut self);
    /// Reveal the window once the host UI has loaded.
    fn show(&mut self);
    /// Switch the runtime log filter. Returns whether debug logging is on.
    fn set_debug_logging(&mut self, enabled: bool) -> bool;
    fn version(&self) -> String;
}

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// Partition for `view:create` requests that name none.
    pub default_partition: Option<String>,
    pub debounce: Duration,
    pub forward_mouse_moves: bool,
    /// Chrome offsets used when a measurement carries none.
    pub placement: Placement,
    pub debug_ui_toggle: bool,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            default_partition: None,
            debounce: DEFAULT_DEBOUNCE,
            forward_mouse_moves: true,
            placement: Placement::new(260, 48),
            debug_ui_toggle: true,
        }
    }
}

pub(crate) type Outbox = Arc<Mutex<Vec<Outbound>>>;

pub struct SurfaceService<H: SurfaceHost, C: ShellControls> {
    controller: SurfaceController<H>,
    shell: C,
    settings: ServiceSettings,
    bounds: BoundsSynchronizer,
    passthrough: PassthroughController,
    inbox: mpsc::UnboundedReceiver<Inbound>,
    sender: InboundSender,
    outbox: Outbox,
    /// Owner-routed relay subscriptions per surface.
    forwarders: HashMap<SurfaceId, Vec<Subscription>>,
    connections: Arc<Mutex<BTreeSet<ConnectionId>>>,
    maximized: bool,
    maximized_forwarder: Option<Subscription>,
}

impl<H: SurfaceHost, C: ShellControls> SurfaceService<H, C> {
    pub fn new(host: H, shell: C, settings: ServiceSettings) -> Self {
        let (sender, inbox) = InboundSender::channel();
        let relay = EventRelay::new();
        let outbox: Outbox = Arc::new(Mutex::new(Vec::new()));
        let connections = Arc::new(Mutex::new(BTreeSet::new()));

        let maximized_forwarder = {
            let outbox = Arc::clone(&outbox);
            let connections = Arc::clone(&connections);
            relay.subscribe_window_maximized(move |maximized: &bool| {
                let targets: Vec<ConnectionId> = match connections.lock() {
                    Ok(set) => set.iter().copied().collect(),
                    Err(_) => return,
                };
                for connection in targets {
                    push_outbound(
                        &outbox,
                        connection,
                        HostMessage::WindowMaximized {
                            maximized: *maximized,
                        },
                    );
                }
            })
        };

        let maximized = shell.is_maximized();
        Self {
            controller: SurfaceController::new(host, relay, sender.clone()),
            shell,
            bounds: BoundsSynchronizer::new(settings.debounce, settings.placement),
            passthrough: PassthroughController::new(settings.forward_mouse_moves),
            settings,
            inbox,
            sender,
            outbox,
            forwarders: HashMap::new(),
            connections,
            maximized,
            maximized_forwarder: Some(maximized_forwarder),
        }
    }

    /// Producer handle for IPC handlers and native event sinks.
    pub fn sender(&self) -> InboundSender {
        self.sender.clone()
    }

    pub fn relay(&self) -> &EventRelay {
        self.controller.relay()
    }

    pub fn controller(&self) -> &SurfaceController<H> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut SurfaceController<H> {
        &mut self.controller
    }

    pub fn shell(&self) -> &C {
        &self.shell
    }

    pub fn shell_mut(&mut self) -> &mut C {
        &mut self.shell
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    /// Make `connection` a recipient of window-level events.
    pub fn register_connection(&mut self, connection: ConnectionId) {
        if let Ok(mut set) = self.connections.lock() {
            if set.insert(connection) {
                debug!(%connection, "host connection registered");
            }
        }
    }

    /// Forget `connection` and destroy every surface it owns, e.g. when
    /// the host-UI document reloads.
    pub fn disconnect(&mut self, connection: ConnectionId) -> usize {
        if let Ok(mut set) = self.connections.lock() {
            set.remove(&connection);
        }
        let owned: Vec<SurfaceId> = self
            .controller
            .registry()
            .ids()
            .into_iter()
            .filter(|id| self.controller.owner_of(id) == Some(connection))
            .collect();
        for id in &owned {
            self.teardown(id);
        }
        if !owned.is_empty() {
            info!(%connection, count = owned.len(), "host connection dropped its surfaces");
        }
        owned.len()
    }

    /// Process every queued message, then flush bounds that are due.
    /// Returns the number of queued messages handled.
    pub fn pump(&mut self, now: Instant) -> usize {
        let mut handled = 0;
        while let Ok(message) = self.inbox.try_recv() {
            match message {
                Inbound::Host {
                    connection,
                    envelope,
                } => self.handle(connection, envelope, now),
                Inbound::Native { id, event } => self.controller.handle_native(&id, event),
            }
            handled += 1;
        }
        self.flush_bounds(now);
        handled
    }

    /// Push every coalesced bounds update whose window has elapsed.
    pub fn flush_bounds(&mut self, now: Instant) {
        for (id, bounds) in self.bounds.due(now) {
            self.controller.set_bounds(&id, bounds);
        }
    }

    /// Surfaces, created or staged, whose geometry is retained.
    pub fn tracked_bounds(&self) -> usize {
        self.bounds.tracked_len()
    }

    /// Earliest pending bounds flush, for the embedder's wake-up timer.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.bounds.next_deadline()
    }

    /// Report the window's maximized state. Only transitions are published.
    pub fn window_maximized_changed(&mut self, maximized: bool) -> bool {
        if self.maximized == maximized {
            return false;
        }
        self.maximized = maximized;
        self.controller.relay().publish_window_maximized(maximized);
        true
    }

    /// Take everything queued for the host UI.
    pub fn drain_outbound(&self) -> Vec<Outbound> {
        match self.outbox.lock() {
            Ok(mut outbox) => std::mem::take(&mut *outbox),
            Err(_) => Vec::new(),
        }
    }

    /// Destroy every surface and drop all relay subscriptions.
    pub fn shutdown(&mut self) -> usize {
        self.pump(Instant::now());
        for id in self.controller.registry().ids() {
            self.teardown(&id);
        }
        for (_, subs) in self.forwarders.drain() {
            subs.into_iter().for_each(Subscription::unsubscribe);
        }
        if let Some(sub) = self.maximized_forwarder.take() {
            sub.unsubscribe();
        }
        let remaining = self.controller.shutdown();
        info!(remaining, "surface service shut down");
        remaining
    }

    pub(crate) fn reply(&self, connection: ConnectionId, message: HostMessage) {
        push_outbound(&self.outbox, connection, message);
    }
}

pub(crate) fn push_outbound(outbox: &Outbox, connection: ConnectionId, message: HostMessage) {
    if let Ok(mut queue) = outbox.lock() {
        queue.push(Outbound {
            connection,
            message,
        });
    }
}
