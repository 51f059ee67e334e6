//! `NativeSurface` over a child wry webview.

use std::sync::{Arc, Mutex};

use omni_common::{Bounds, SurfaceId};
use omni_surface::{
    Disposer, EventSink, LoadTicket, NativeError, NativeEvent, NativeSurface, NavigationOutcome,
    ERR_ABORTED,
};
use tracing::debug;
use wry::raw_window_handle;
use wry::{PageLoadEvent, WebView, WebViewBuilder};

use super::external;

/// Per-surface knobs taken from `[surfaces]`.
#[derive(Debug, Clone, Default)]
pub struct SurfaceOptions {
    pub user_agent: Option<String>,
    pub devtools: bool,
}

/// State shared between the surface and its wry handlers.
#[derive(Default)]
pub(super) struct SurfaceShared {
    sink: Mutex<Option<EventSink>>,
    pending: Mutex<Option<LoadTicket>>,
    title: Mutex<Option<String>>,
}

impl SurfaceShared {
    /// Events are dropped while nobody listens.
    pub(super) fn emit(&self, event: NativeEvent) {
        if let Ok(sink) = self.sink.lock() {
            if let Some(sink) = sink.as_ref() {
                sink.emit(event);
            }
        }
    }

    fn set_sink(&self, sink: Option<EventSink>) {
        if let Ok(mut slot) = self.sink.lock() {
            *slot = sink;
        }
    }

    /// Install `ticket` as the pending load, returning the one it replaces.
    pub(super) fn replace_pending(&self, ticket: LoadTicket) -> Option<LoadTicket> {
        self.pending.lock().ok().and_then(|mut p| p.replace(ticket))
    }

    pub(super) fn take_pending(&self) -> Option<LoadTicket> {
        self.pending.lock().ok().and_then(|mut p| p.take())
    }

    fn title(&self) -> Option<String> {
        self.title.lock().ok().and_then(|t| t.clone())
    }

    fn set_title(&self, title: String) {
        if let Ok(mut slot) = self.title.lock() {
            *slot = Some(title);
        }
    }

    /// A finished page load commits the URL, stops loading, and settles
    /// whichever ticket is pending.
    pub(super) fn page_finished(&self, url: String) {
        self.emit(NativeEvent::DidNavigate(url));
        self.emit(NativeEvent::DidStopLoading);
        if let Some(ticket) = self.take_pending() {
            self.emit(NativeEvent::LoadSettled {
                ticket,
                outcome: NavigationOutcome::Completed,
            });
        }
    }

    /// A newer load replaced `ticket` before it finished.
    pub(super) fn abort(&self, ticket: LoadTicket) {
        self.emit(NativeEvent::LoadSettled {
            ticket,
            outcome: NavigationOutcome::from_failure(ERR_ABORTED, "ERR_ABORTED"),
        });
    }
}

pub struct WrySurface {
    id: SurfaceId,
    webview: Option<WebView>,
    shared: Arc<SurfaceShared>,
    /// Parked at zero size by the bounds synchronizer.
    parked: bool,
    /// Input forced through to the host UI.
    passthrough: bool,
}

impl WrySurface {
    /// Build a hidden child webview of `window`. It becomes visible with
    /// its first non-empty bounds.
    pub(super) fn build<'a, W: raw_window_handle::HasWindowHandle>(
        id: SurfaceId,
        builder: WebViewBuilder<'a>,
        window: &W,
        options: &SurfaceOptions,
    ) -> Result<Self, NativeError> {
        let shared = Arc::new(SurfaceShared::default());

        let mut builder = builder
            .with_bounds(physical_rect(Bounds::hidden()))
            .with_visible(false)
            .with_devtools(options.devtools)
            .with_focused(false);

        if let Some(ua) = &options.user_agent {
            builder = builder.with_user_agent(ua);
        }

        let loads = Arc::clone(&shared);
        let sid = id.clone();
        builder = builder.with_on_page_load_handler(move |event, url| match event {
            PageLoadEvent::Started => {
                debug!(surface_id = %sid, url = %url, "surface load started");
                loads.emit(NativeEvent::DidStartLoading);
            }
            PageLoadEvent::Finished => {
                debug!(surface_id = %sid, url = %url, "surface load finished");
                loads.page_finished(url);
            }
        });

        let titles = Arc::clone(&shared);
        builder = builder.with_document_title_changed_handler(move |title| {
            titles.set_title(title.clone());
            titles.emit(NativeEvent::PageTitleUpdated(title));
        });

        let sid = id.clone();
        builder = builder.with_new_window_req_handler(move |url| {
            debug!(surface_id = %sid, url = %url, "new window request");
            external::open_external(&url);
            false
        });

        let webview = builder
            .build_as_child(window)
            .map_err(|e| NativeError::Backend(e.to_string()))?;

        debug!(surface_id = %id, "native surface built");
        Ok(Self {
            id,
            webview: Some(webview),
            shared,
            parked: true,
            passthrough: false,
        })
    }

    fn webview(&self) -> Result<&WebView, NativeError> {
        self.webview.as_ref().ok_or(NativeError::Released)
    }

    fn apply_visibility(&self) -> Result<(), NativeError> {
        let visible = !self.parked && !self.passthrough;
        self.webview()?.set_visible(visible).map_err(backend)
    }
}

impl NativeSurface for WrySurface {
    fn load_url(&mut self, ticket: LoadTicket) -> Result<(), NativeError> {
        let webview = self.webview.as_ref().ok_or(NativeError::Released)?;
        let url = ticket.url().to_string();
        if let Some(previous) = self.shared.replace_pending(ticket) {
            debug!(surface_id = %self.id, superseded = previous.seq(), "aborting previous load");
            self.shared.abort(previous);
        }
        webview.load_url(&url).map_err(|e| {
            self.shared.take_pending();
            backend(e)
        })
    }

    fn current_url(&self) -> Option<String> {
        self.webview
            .as_ref()
            .and_then(|w| w.url().ok())
            .filter(|u| !u.is_empty())
    }

    fn title(&self) -> Option<String> {
        self.shared.title()
    }

    fn set_bounds(&mut self, bounds: Bounds) -> Result<(), NativeError> {
        if !bounds.is_hidden() {
            self.webview()?
                .set_bounds(physical_rect(bounds))
                .map_err(backend)?;
        }
        self.parked = bounds.is_hidden();
        self.apply_visibility()
    }

    /// The system webview is composited above the host UI, so an overlay
    /// only becomes reachable by hiding the surface. Mouse-move forwarding
    /// has no equivalent and is ignored.
    fn set_ignore_mouse_events(&mut self, ignore: bool, forward: bool) -> Result<(), NativeError> {
        if forward {
            debug!(surface_id = %self.id, "mouse-move forwarding unsupported");
        }
        self.passthrough = ignore;
        self.apply_visibility()
    }

    fn listen(&mut self, sink: EventSink) -> Disposer {
        self.shared.set_sink(Some(sink));
        let shared = Arc::clone(&self.shared);
        Disposer::new(move || shared.set_sink(None))
    }

    fn detach(&mut self) -> Result<(), NativeError> {
        self.webview()?.set_visible(false).map_err(backend)
    }

    fn release(&mut self) {
        self.shared.take_pending();
        self.shared.set_sink(None);
        if self.webview.take().is_some() {
            debug!(surface_id = %self.id, "native surface released");
        }
    }
}

pub(super) fn physical_rect(bounds: Bounds) -> wry::Rect {
    wry::Rect {
        position: wry::dpi::Position::Physical(wry::dpi::PhysicalPosition::new(
            i32::try_from(bounds.x).unwrap_or(i32::MAX),
            i32::try_from(bounds.y).unwrap_or(i32::MAX),
        )),
        size: wry::dpi::Size::Physical(wry::dpi::PhysicalSize::new(bounds.width, bounds.height)),
    }
}

fn backend(e: wry::Error) -> NativeError {
    NativeError::Backend(e.to_string())
}
