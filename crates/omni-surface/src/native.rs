//! Boundary to the native rendering engine.
//!
//! A backend implements [`SurfaceHost`] (window lookup and surface
//! allocation) and [`NativeSurface`] (per-surface navigation, geometry and
//! input). Everything the engine reports comes back as [`NativeEvent`]s
//! pushed through an [`EventSink`].

use std::fmt;

use omni_common::{Bounds, ConnectionId, SurfaceId, WindowId};

use crate::partition::Partition;
use crate::queue::InboundSender;

/// Engine error code for a navigation aborted by the user or by a newer
/// navigation.
pub const ERR_ABORTED: i32 = -3;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NativeError {
    #[error("backend error: {0}")]
    Backend(String),

    #[error("surface already released")]
    Released,
}

/// Identifies one `load` call. Backends echo it back in
/// [`NativeEvent::LoadSettled`] so superseded loads can be told apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    seq: u64,
    url: String,
}

impl LoadTicket {
    pub fn new(seq: u64, url: impl Into<String>) -> Self {
        Self {
            seq,
            url: url.into(),
        }
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// The URL that was requested (not necessarily the one committed).
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// How a navigation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    Completed,
    /// Superseded or cancelled; benign.
    Aborted,
    Failed { code: i32, description: String },
}

impl NavigationOutcome {
    /// Classify an engine failure code.
    pub fn from_failure(code: i32, description: impl Into<String>) -> Self {
        if code == ERR_ABORTED {
            Self::Aborted
        } else {
            Self::Failed {
                code,
                description: description.into(),
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Lifecycle events reported by a native surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeEvent {
    DidStartLoading,
    DidStopLoading,
    DidFailLoad {
        code: i32,
        description: String,
        url: String,
    },
    PageTitleUpdated(String),
    DidNavigate(String),
    DidNavigateInPage(String),
    /// The navigation started for `ticket` has finished.
    LoadSettled {
        ticket: LoadTicket,
        outcome: NavigationOutcome,
    },
}

/// Where a surface delivers its native events. Cheap to clone.
#[derive(Debug, Clone)]
pub struct EventSink {
    id: SurfaceId,
    sender: InboundSender,
}

impl EventSink {
    pub fn new(id: SurfaceId, sender: InboundSender) -> Self {
        Self { id, sender }
    }

    pub fn id(&self) -> &SurfaceId {
        &self.id
    }

    pub fn emit(&self, event: NativeEvent) {
        self.sender.native(self.id.clone(), event);
    }
}

/// Undoes one listener registration. Consumed on use, so it runs at most once.
pub struct Disposer(Box<dyn FnOnce() + Send>);

impl Disposer {
    pub fn new(f: impl FnOnce() + Send + 'static) -> Self {
        Self(Box::new(f))
    }

    pub fn noop() -> Self {
        Self::new(|| {})
    }

    pub fn dispose(self) {
        (self.0)()
    }
}

impl fmt::Debug for Disposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Disposer")
    }
}

/// What the controller asks a host to allocate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceSpec {
    pub id: SurfaceId,
    pub partition: Partition,
}

/// A live native rendering surface attached to a window.
pub trait NativeSurface {
    /// Start navigating. Completion is reported later as
    /// [`NativeEvent::LoadSettled`] carrying the same ticket.
    fn load_url(&mut self, ticket: LoadTicket) -> Result<(), NativeError>;

    /// Committed URL, if any navigation has committed.
    fn current_url(&self) -> Option<String>;

    fn title(&self) -> Option<String>;

    fn set_bounds(&mut self, bounds: Bounds) -> Result<(), NativeError>;

    fn set_ignore_mouse_events(&mut self, ignore: bool, forward: bool) -> Result<(), NativeError>;

    /// Wire native navigation events into `sink`.
    fn listen(&mut self, sink: EventSink) -> Disposer;

    /// Remove the surface from its window's render stack.
    fn detach(&mut self) -> Result<(), NativeError>;

    /// Free the native resource. The surface is unusable afterwards.
    fn release(&mut self);
}

/// Allocates surfaces and knows which window belongs to which host-UI
/// connection.
pub trait SurfaceHost {
    type Surface: NativeSurface;

    fn resolve_window(&self, connection: ConnectionId) -> Option<WindowId>;

    /// Allocate a surface in `spec.partition` and attach it to `window`.
    fn create_surface(
        &mut self,
        window: WindowId,
        spec: &SurfaceSpec,
    ) -> Result<Self::Surface, NativeError>;
}
