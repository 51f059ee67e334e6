//! Embedded web-surface lifecycle management for the Omni shell.
//!
//! Provides:
//! - A registry of live surfaces keyed by host-UI chosen ids
//! - Idempotent create / load / destroy against a native surface host
//! - Debounced bounds synchronization from placeholder measurements
//! - Per-id and global event relay back to the host UI
//! - Mouse passthrough for overlays drawn above a surface
//! - The JSON IPC protocol spoken with the host-UI document
//!
//! The rendering engine itself is reached only through the traits in
//! [`native`].

pub mod bounds;
pub mod content;
pub mod controller;
pub mod events;
pub mod ipc;
pub mod native;
pub mod partition;
pub mod passthrough;
pub mod queue;
pub mod registry;
pub mod relay;
pub mod service;

pub use bounds::{compute_bounds, BoundsCoalescer, BoundsSynchronizer, Placement};
pub use content::ContentProvider;
pub use controller::SurfaceController;
pub use events::PageInfo;
pub use ipc::{HostEnvelope, HostMessage, HostRequest, Outbound};
pub use native::{
    Disposer, EventSink, LoadTicket, NativeError, NativeEvent, NativeSurface, NavigationOutcome,
    SurfaceHost, SurfaceSpec, ERR_ABORTED,
};
pub use partition::Partition;
pub use passthrough::{PassthroughChange, PassthroughController};
pub use queue::{Inbound, InboundSender};
pub use registry::{RegistryEntry, SurfaceRegistry};
pub use relay::{Channel, EventRelay, Subscription};
pub use service::{ServiceSettings, ShellControls, SurfaceService};
