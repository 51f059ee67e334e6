//! The controller's task queue.
//!
//! Host-UI requests and native surface events share one unbounded channel,
//! so the controller sees them in arrival order and handles each as a single
//! step.

use omni_common::{ConnectionId, SurfaceId};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::ipc::HostEnvelope;
use crate::native::NativeEvent;

#[derive(Debug)]
pub enum Inbound {
    Host {
        connection: ConnectionId,
        envelope: HostEnvelope,
    },
    Native {
        id: SurfaceId,
        event: NativeEvent,
    },
}

/// Producer half of the queue. Cloned into IPC handlers and event sinks.
#[derive(Debug, Clone)]
pub struct InboundSender {
    tx: mpsc::UnboundedSender<Inbound>,
}

impl InboundSender {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Inbound>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn host(&self, connection: ConnectionId, envelope: HostEnvelope) {
        if self
            .tx
            .send(Inbound::Host {
                connection,
                envelope,
            })
            .is_err()
        {
            debug!(%connection, "host request dropped: controller gone");
        }
    }

    /// Parse a raw IPC body and enqueue it. Malformed or unknown messages
    /// are logged and dropped here so they never reach the controller.
    pub fn host_raw(&self, connection: ConnectionId, body: &str) -> bool {
        match HostEnvelope::parse(body) {
            Ok(envelope) => {
                self.host(connection, envelope);
                true
            }
            Err(e) => {
                warn!(%connection, body_len = body.len(), error = %e, "IPC message rejected");
                false
            }
        }
    }

    pub fn native(&self, id: SurfaceId, event: NativeEvent) {
        if self.tx.send(Inbound::Native { id, event }).is_err() {
            debug!("native event dropped: controller gone");
        }
    }
}
