//! Wire protocol between the host-UI document and the surface service.
//!
//! Messages flow in both directions:
//! - **UI -> Rust**: `window.ipc.postMessage(JSON.stringify({kind, requestId?, payload}))`,
//!   decoded here into a [`HostEnvelope`].
//! - **Rust -> UI**: a [`HostMessage`] rendered by [`HostMessage::to_script`] and
//!   evaluated in the host-UI webview, which calls `window.omni._dispatch`.

use omni_common::{Bounds, ConnectionId, PlaceholderRect, SurfaceId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Raw message shape as posted by the host UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpcMessage {
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<u64>,
    #[serde(default)]
    pub payload: Value,
}

/// Request kinds accepted from the host UI. Anything else is rejected.
pub const ALLOWED_KINDS: &[&str] = &[
    "view:create",
    "view:load",
    "view:set-bounds",
    "view:measure",
    "view:destroy",
    "view:set-ignore-mouse-events",
    "view:overlay-state",
    "app:get-version",
    "app:set-debug-logging",
    "app:ready",
    "window:minimize",
    "window:toggle-maximize",
    "window:close",
    "window:is-maximized",
    "window:start-drag",
];

pub fn is_kind_allowed(kind: &str) -> bool {
    ALLOWED_KINDS.contains(&kind)
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IpcError {
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    #[error("unknown kind: {0}")]
    UnknownKind(String),

    #[error("invalid payload for {kind}: {reason}")]
    InvalidPayload { kind: String, reason: String },
}

// =============================================================================
// REQUESTS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePayload {
    pub id: SurfaceId,
    #[serde(default)]
    pub partition: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadPayload {
    pub id: SurfaceId,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetBoundsPayload {
    pub id: SurfaceId,
    pub bounds: Bounds,
}

/// A placeholder measurement. Missing offsets fall back to the configured
/// sidebar width and header height.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurePayload {
    pub id: SurfaceId,
    pub rect: PlaceholderRect,
    #[serde(default)]
    pub left_offset: Option<i32>,
    #[serde(default)]
    pub top_offset: Option<i32>,
    #[serde(default = "default_true")]
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestroyPayload {
    pub id: SurfaceId,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IgnoreMousePayload {
    pub id: SurfaceId,
    pub ignore: bool,
    #[serde(default)]
    pub forward: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayStatePayload {
    pub id: SurfaceId,
    pub overlay_active: bool,
    #[serde(default = "default_true")]
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugLoggingPayload {
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq)]
pub enum HostRequest {
    Create(CreatePayload),
    Load(LoadPayload),
    SetBounds(SetBoundsPayload),
    Measure(MeasurePayload),
    Destroy(DestroyPayload),
    SetIgnoreMouseEvents(IgnoreMousePayload),
    OverlayState(OverlayStatePayload),
    GetVersion,
    SetDebugLogging(DebugLoggingPayload),
    Ready,
    WindowMinimize,
    WindowToggleMaximize,
    WindowClose,
    WindowIsMaximized,
    WindowStartDrag,
}

impl HostRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Create(_) => "view:create",
            Self::Load(_) => "view:load",
            Self::SetBounds(_) => "view:set-bounds",
            Self::Measure(_) => "view:measure",
            Self::Destroy(_) => "view:destroy",
            Self::SetIgnoreMouseEvents(_) => "view:set-ignore-mouse-events",
            Self::OverlayState(_) => "view:overlay-state",
            Self::GetVersion => "app:get-version",
            Self::SetDebugLogging(_) => "app:set-debug-logging",
            Self::Ready => "app:ready",
            Self::WindowMinimize => "window:minimize",
            Self::WindowToggleMaximize => "window:toggle-maximize",
            Self::WindowClose => "window:close",
            Self::WindowIsMaximized => "window:is-maximized",
            Self::WindowStartDrag => "window:start-drag",
        }
    }

    /// The surface a `view:*` request targets.
    pub fn surface_id(&self) -> Option<&SurfaceId> {
        match self {
            Self::Create(p) => Some(&p.id),
            Self::Load(p) => Some(&p.id),
            Self::SetBounds(p) => Some(&p.id),
            Self::Measure(p) => Some(&p.id),
            Self::Destroy(p) => Some(&p.id),
            Self::SetIgnoreMouseEvents(p) => Some(&p.id),
            Self::OverlayState(p) => Some(&p.id),
            _ => None,
        }
    }

    fn decode(kind: &str, payload: Value) -> Result<Self, IpcError> {
        if !is_kind_allowed(kind) {
            return Err(IpcError::UnknownKind(kind.to_string()));
        }
        let request = match kind {
            "view:create" => Self::Create(payload_as(kind, payload)?),
            "view:load" => Self::Load(payload_as(kind, payload)?),
            "view:set-bounds" => Self::SetBounds(payload_as(kind, payload)?),
            "view:measure" => Self::Measure(payload_as(kind, payload)?),
            "view:destroy" => Self::Destroy(payload_as(kind, payload)?),
            "view:set-ignore-mouse-events" => Self::SetIgnoreMouseEvents(payload_as(kind, payload)?),
            "view:overlay-state" => Self::OverlayState(payload_as(kind, payload)?),
            "app:get-version" => Self::GetVersion,
            "app:set-debug-logging" => Self::SetDebugLogging(payload_as(kind, payload)?),
            "app:ready" => Self::Ready,
            "window:minimize" => Self::WindowMinimize,
            "window:toggle-maximize" => Self::WindowToggleMaximize,
            "window:close" => Self::WindowClose,
            "window:is-maximized" => Self::WindowIsMaximized,
            "window:start-drag" => Self::WindowStartDrag,
            other => return Err(IpcError::UnknownKind(other.to_string())),
        };
        Ok(request)
    }
}

fn payload_as<T: DeserializeOwned>(kind: &str, payload: Value) -> Result<T, IpcError> {
    serde_json::from_value(payload).map_err(|e| IpcError::InvalidPayload {
        kind: kind.to_string(),
        reason: e.to_string(),
    })
}

/// A decoded host-UI request plus its optional correlation id.
#[derive(Debug, Clone, PartialEq)]
pub struct HostEnvelope {
    pub request_id: Option<u64>,
    pub request: HostRequest,
}

impl HostEnvelope {
    /// Parse a raw IPC body (from `postMessage`).
    pub fn parse(raw: &str) -> Result<Self, IpcError> {
        let msg: IpcMessage =
            serde_json::from_str(raw).map_err(|e| IpcError::InvalidJson(e.to_string()))?;
        let request = HostRequest::decode(&msg.kind, msg.payload)?;
        Ok(Self {
            request_id: msg.request_id,
            request,
        })
    }
}

// =============================================================================
// MESSAGES TO THE HOST UI
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum HostMessage {
    Reply {
        request_id: u64,
        ok: bool,
        value: Value,
        error: Option<String>,
    },
    Loading {
        id: SurfaceId,
        is_loading: bool,
    },
    PageInfo {
        id: SurfaceId,
        url: String,
        title: String,
    },
    WindowMaximized {
        maximized: bool,
    },
}

impl HostMessage {
    pub fn reply_ok(request_id: u64, value: Value) -> Self {
        Self::Reply {
            request_id,
            ok: true,
            value,
            error: None,
        }
    }

    pub fn reply_err(request_id: u64, error: impl Into<String>) -> Self {
        Self::Reply {
            request_id,
            ok: false,
            value: Value::Null,
            error: Some(error.into()),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Reply { .. } => "reply",
            Self::Loading { .. } => "view:loading",
            Self::PageInfo { .. } => "view:page-info",
            Self::WindowMaximized { .. } => "window:maximized",
        }
    }

    pub fn payload(&self) -> Value {
        match self {
            Self::Reply {
                request_id,
                ok,
                value,
                error,
            } => {
                let mut payload = json!({ "requestId": request_id, "ok": ok, "value": value });
                if let Some(error) = error {
                    payload["error"] = json!(error);
                }
                payload
            }
            Self::Loading { id, is_loading } => json!({ "id": id, "isLoading": is_loading }),
            Self::PageInfo { id, url, title } => json!({ "id": id, "url": url, "title": title }),
            Self::WindowMaximized { maximized } => json!({ "maximized": maximized }),
        }
    }

    /// JavaScript that delivers this message inside the host-UI webview.
    pub fn to_script(&self) -> String {
        js_dispatch_message(self.kind(), &self.payload())
    }
}

/// A message addressed to one host-UI connection.
#[derive(Debug, Clone, PartialEq)]
pub struct Outbound {
    pub connection: ConnectionId,
    pub message: HostMessage,
}

/// Generate a JS snippet that dispatches a message to the host-UI bridge.
pub fn js_dispatch_message(kind: &str, payload: &Value) -> String {
    let payload_json = serde_json::to_string(payload).unwrap_or_else(|_| "null".to_string());
    format!(
        "window.omni && window.omni._dispatch({}, {});",
        serde_json::to_string(kind).unwrap_or_else(|_| "\"unknown\"".to_string()),
        payload_json,
    )
}

/// Bridge injected as an initialization script into the host-UI webview.
pub const HOST_INIT_SCRIPT: &str = r#"
(function() {
    if (window.omni) return;
    var nextRequestId = 1;
    var pending = {};
    var perId = { 'view:loading': {}, 'view:page-info': {} };
    var maximizedListeners = [];

    function post(msg) {
        window.ipc.postMessage(JSON.stringify(msg));
    }
    function send(kind, payload) {
        post({ kind: kind, payload: payload || null });
    }
    function request(kind, payload) {
        return new Promise(function(resolve, reject) {
            var requestId = nextRequestId++;
            pending[requestId] = { resolve: resolve, reject: reject };
            post({ kind: kind, requestId: requestId, payload: payload || null });
        });
    }
    function subscribe(kind, id, callback) {
        var map = perId[kind];
        (map[id] = map[id] || []).push(callback);
        return function() {
            var set = map[id];
            if (!set) return;
            var i = set.indexOf(callback);
            if (i >= 0) set.splice(i, 1);
            if (set.length === 0) delete map[id];
        };
    }
    function emit(callbacks, value) {
        callbacks.slice().forEach(function(cb) {
            try { cb(value); } catch (e) { console.error('[omni] listener failed', e); }
        });
    }

    window.omni = {
        _dispatch: function(kind, payload) {
            if (kind === 'reply') {
                var p = pending[payload.requestId];
                if (!p) return;
                delete pending[payload.requestId];
                if (payload.ok) { p.resolve(payload.value); }
                else { p.reject(new Error(payload.error || 'request failed')); }
            } else if (kind === 'view:loading') {
                emit(perId[kind][payload.id] || [], payload.isLoading);
            } else if (kind === 'view:page-info') {
                emit(perId[kind][payload.id] || [], { url: payload.url, title: payload.title });
            } else if (kind === 'window:maximized') {
                emit(maximizedListeners, payload.maximized);
            }
        },
        webview: {
            create: function(id, partition) { return request('view:create', { id: id, partition: partition }); },
            load: function(id, url) { return request('view:load', { id: id, url: url }); },
            setBounds: function(id, bounds) { send('view:set-bounds', { id: id, bounds: bounds }); },
            measure: function(id, rect, opts) {
                opts = opts || {};
                send('view:measure', {
                    id: id,
                    rect: { left: rect.left, top: rect.top, width: rect.width, height: rect.height },
                    leftOffset: opts.leftOffset,
                    topOffset: opts.topOffset,
                    active: opts.active !== false
                });
            },
            destroy: function(id) { return request('view:destroy', { id: id }); },
            setIgnoreMouseEvents: function(id, ignore, opts) {
                send('view:set-ignore-mouse-events', { id: id, ignore: !!ignore, forward: !!(opts && opts.forward) });
            },
            setOverlayState: function(id, overlayActive, active) {
                send('view:overlay-state', { id: id, overlayActive: !!overlayActive, active: active !== false });
            },
            onLoading: function(id, cb) { return subscribe('view:loading', id, cb); },
            onPageInfo: function(id, cb) { return subscribe('view:page-info', id, cb); }
        },
        app: {
            getVersion: function() { return request('app:get-version'); },
            setDebugLogging: function(enabled) { return request('app:set-debug-logging', { enabled: !!enabled }); },
            ready: function() { send('app:ready'); }
        },
        window: {
            minimize: function() { send('window:minimize'); },
            toggleMaximize: function() { send('window:toggle-maximize'); },
            close: function() { send('window:close'); },
            isMaximized: function() { return request('window:is-maximized'); },
            startDrag: function() { send('window:start-drag'); },
            onMaximizedChange: function(cb) {
                maximizedListeners.push(cb);
                return function() {
                    var i = maximizedListeners.indexOf(cb);
                    if (i >= 0) maximizedListeners.splice(i, 1);
                };
            }
        }
    };
})();
"#;

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_create_with_request_id() {
        let env = HostEnvelope::parse(
            r#"{"kind":"view:create","requestId":7,"payload":{"id":"v1","partition":"persist:a"}}"#,
        )
        .unwrap();
        assert_eq!(env.request_id, Some(7));
        assert_eq!(
            env.request,
            HostRequest::Create(CreatePayload {
                id: SurfaceId::from("v1"),
                partition: Some("persist:a".into()),
            })
        );
    }

    #[test]
    fn parses_measure_with_defaults() {
        let env = HostEnvelope::parse(
            r#"{"kind":"view:measure","payload":{"id":"v1","rect":{"left":1.5,"top":2,"width":30,"height":40}}}"#,
        )
        .unwrap();
        match env.request {
            HostRequest::Measure(m) => {
                assert_eq!(m.rect, PlaceholderRect::new(1.5, 2.0, 30.0, 40.0));
                assert_eq!(m.left_offset, None);
                assert!(m.active);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unit_requests_ignore_payload() {
        let env = HostEnvelope::parse(r#"{"kind":"window:minimize","payload":null}"#).unwrap();
        assert_eq!(env.request, HostRequest::WindowMinimize);
        let env = HostEnvelope::parse(r#"{"kind":"app:get-version"}"#).unwrap();
        assert_eq!(env.request, HostRequest::GetVersion);
    }

    #[test]
    fn rejects_unknown_kind() {
        let err = HostEnvelope::parse(r#"{"kind":"shell:exec","payload":"rm -rf /"}"#).unwrap_err();
        assert_eq!(err, IpcError::UnknownKind("shell:exec".into()));
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(matches!(
            HostEnvelope::parse("{not json"),
            Err(IpcError::InvalidJson(_))
        ));
    }

    #[test]
    fn rejects_missing_payload_fields() {
        let err = HostEnvelope::parse(r#"{"kind":"view:load","payload":{"id":"v1"}}"#).unwrap_err();
        assert!(matches!(err, IpcError::InvalidPayload { ref kind, .. } if kind == "view:load"));
    }

    #[test]
    fn allowlist_matches_decoder() {
        for kind in ALLOWED_KINDS {
            let err = HostEnvelope::parse(&format!(r#"{{"kind":"{kind}","payload":null}}"#)).err();
            assert!(
                !matches!(err, Some(IpcError::UnknownKind(_))),
                "{kind} is allowed but not decoded"
            );
        }
    }

    #[test]
    fn surface_id_of_view_requests() {
        let env = HostEnvelope::parse(r#"{"kind":"view:destroy","payload":{"id":"x"}}"#).unwrap();
        assert_eq!(env.request.surface_id().map(SurfaceId::as_str), Some("x"));
        assert_eq!(HostRequest::WindowClose.surface_id(), None);
    }

    #[test]
    fn reply_payload_shape() {
        let ok = HostMessage::reply_ok(3, json!("1.0.0")).payload();
        assert_eq!(ok, json!({ "requestId": 3, "ok": true, "value": "1.0.0" }));

        let err = HostMessage::reply_err(4, "no window").payload();
        assert_eq!(err["ok"], json!(false));
        assert_eq!(err["error"], json!("no window"));
    }

    #[test]
    fn page_info_script() {
        let msg = HostMessage::PageInfo {
            id: SurfaceId::from("v1"),
            url: "https://example.com".into(),
            title: "Ex \"quoted\"".into(),
        };
        let script = msg.to_script();
        assert!(script.starts_with("window.omni && window.omni._dispatch(\"view:page-info\""));
        assert!(script.contains(r#"\"quoted\""#));
    }

    #[test]
    fn loading_payload_is_camel_case() {
        let msg = HostMessage::Loading {
            id: SurfaceId::from("v1"),
            is_loading: true,
        };
        assert_eq!(msg.payload(), json!({ "id": "v1", "isLoading": true }));
    }

    #[test]
    fn init_script_exposes_api() {
        for name in ["_dispatch", "onPageInfo", "setOverlayState", "onMaximizedChange", "getVersion"] {
            assert!(HOST_INIT_SCRIPT.contains(name), "missing {name}");
        }
    }
}
