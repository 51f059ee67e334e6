//! The host-UI webview: serves the bundled shell over `omni://` and carries
//! the JSON IPC channel to the surface service.

use std::borrow::Cow;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use omni_common::ConnectionId;
use omni_surface::content::{self, ContentProvider, ENTRY_URL, SCHEME};
use omni_surface::ipc::HOST_INIT_SCRIPT;
use omni_surface::{InboundSender, Outbound};
use tracing::{debug, info, warn};
use winit::dpi::PhysicalSize;
use winit::window::Window;
use wry::http::Response;
use wry::{PageLoadEvent, WebView, WebViewBuilder};

use super::external;

/// Values the shell page reads from `window.omniConfig` at startup.
#[derive(Debug, Clone)]
pub struct ShellPageConfig {
    pub start_url: String,
    pub sidebar_width: u32,
    pub header_height: u32,
    pub background: (u8, u8, u8, u8),
    pub devtools: bool,
}

pub struct HostUi {
    webview: WebView,
    connection: ConnectionId,
    /// Document loads started, counted by the page-load handler.
    loads: Arc<AtomicUsize>,
    seen_loads: usize,
}

impl HostUi {
    pub fn build(
        window: &Window,
        provider: ContentProvider,
        sender: InboundSender,
        connection: ConnectionId,
        page: &ShellPageConfig,
    ) -> Result<Self, wry::Error> {
        let loads = Arc::new(AtomicUsize::new(0));
        let provider = Arc::new(provider);

        let counter = Arc::clone(&loads);
        let webview = WebViewBuilder::new()
            .with_bounds(full_window_rect(window.inner_size()))
            .with_background_color(page.background)
            .with_devtools(page.devtools)
            .with_initialization_script(HOST_INIT_SCRIPT)
            .with_initialization_script(&config_script(page))
            .with_ipc_handler(move |request| {
                let body = request.body();
                debug!(%connection, body_len = body.len(), "IPC message from host UI");
                sender.host_raw(connection, body);
            })
            .with_on_page_load_handler(move |event, url| {
                if let PageLoadEvent::Started = event {
                    let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                    debug!(url = %url, load = n, "host UI load started");
                }
            })
            .with_new_window_req_handler(|url| {
                external::open_external(&url);
                false
            })
            .with_custom_protocol(SCHEME.to_string(), move |_wv_id, request| {
                serve(&provider, &request.uri().to_string())
            })
            .with_url(ENTRY_URL)
            .build_as_child(window)?;

        info!(%connection, url = ENTRY_URL, "host UI created");
        Ok(Self {
            webview,
            connection,
            loads,
            seen_loads: 0,
        })
    }

    pub fn connection(&self) -> ConnectionId {
        self.connection
    }

    /// Whether the document reloaded since the last call. The first load
    /// does not count.
    pub fn take_reload(&mut self) -> bool {
        let loads = self.loads.load(Ordering::SeqCst);
        let reloaded = self.seen_loads > 0 && loads > self.seen_loads;
        self.seen_loads = loads;
        reloaded
    }

    /// Deliver one outbound message if it is addressed to this document.
    pub fn deliver(&self, outbound: &Outbound) {
        if outbound.connection != self.connection {
            debug!(connection = %outbound.connection, "outbound for unknown connection dropped");
            return;
        }
        if let Err(e) = self.webview.evaluate_script(&outbound.message.to_script()) {
            warn!(kind = outbound.message.kind(), error = %e, "failed to deliver to host UI");
        }
    }

    pub fn resize(&self, size: PhysicalSize<u32>) {
        if let Err(e) = self.webview.set_bounds(full_window_rect(size)) {
            warn!(error = %e, "failed to resize host UI");
        }
    }
}

fn full_window_rect(size: PhysicalSize<u32>) -> wry::Rect {
    wry::Rect {
        position: wry::dpi::Position::Physical(wry::dpi::PhysicalPosition::new(0, 0)),
        size: wry::dpi::Size::Physical(wry::dpi::PhysicalSize::new(size.width, size.height)),
    }
}

pub(crate) fn config_script(page: &ShellPageConfig) -> String {
    let config = serde_json::json!({
        "startUrl": page.start_url,
        "sidebarWidth": page.sidebar_width,
        "headerHeight": page.header_height,
    });
    format!("window.omniConfig = Object.freeze({config});")
}

pub(crate) fn serve(provider: &ContentProvider, uri: &str) -> Response<Cow<'static, [u8]>> {
    match provider.resolve_uri(uri) {
        Some(asset) => respond(200, &asset.mime, asset.data.into_owned()),
        None => {
            warn!(uri = %uri, path = ?content::request_path(uri), "custom protocol: asset not found");
            respond(404, "text/plain", b"Not Found".to_vec())
        }
    }
}

fn respond(status: u16, mime: &str, body: Vec<u8>) -> Response<Cow<'static, [u8]>> {
    Response::builder()
        .status(status)
        .header("Content-Type", mime)
        .header("Access-Control-Allow-Origin", "omni://localhost")
        .body(Cow::from(body))
        .unwrap_or_else(|e| {
            warn!(error = %e, "custom protocol: invalid response");
            let mut fallback = Response::new(Cow::from(Vec::new()));
            *fallback.status_mut() = wry::http::StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        })
}
