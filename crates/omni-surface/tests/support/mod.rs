//! In-memory native host for behavioral tests.
//!
//! `MockHost` hands out `MockSurface`s that record every native call in a
//! shared log. Tests drive native events through the sink each surface was
//! given, exactly as a real backend would.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use omni_common::{Bounds, ConnectionId, SurfaceId, WindowId};
use omni_surface::{
    Disposer, EventSink, HostMessage, LoadTicket, NativeError, NativeEvent, NativeSurface,
    NavigationOutcome, Partition, ServiceSettings, ShellControls, SurfaceHost, SurfaceService,
    SurfaceSpec,
};
use serde_json::Value;

pub const CONN: ConnectionId = ConnectionId(1);
pub const OTHER_CONN: ConnectionId = ConnectionId(2);
pub const WINDOW: WindowId = WindowId(1);

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Create(Partition),
    Listen,
    Load(String),
    SetBounds(Bounds),
    SetIgnoreMouse { ignore: bool, forward: bool },
    Detach,
    Dispose,
    Release,
}

#[derive(Default)]
pub struct MockState {
    pub calls: Vec<(SurfaceId, Call)>,
    pub sinks: HashMap<SurfaceId, EventSink>,
    pub urls: HashMap<SurfaceId, String>,
    pub titles: HashMap<SurfaceId, String>,
    pub tickets: HashMap<SurfaceId, Vec<LoadTicket>>,
    pub live: usize,
    pub fail_next_load: bool,
    pub refuse_create: bool,
}

pub type Shared = Arc<Mutex<MockState>>;

fn lock(state: &Shared) -> MutexGuard<'_, MockState> {
    state.lock().unwrap()
}

pub struct MockHost {
    pub state: Shared,
    pub windows: HashMap<ConnectionId, WindowId>,
}

impl MockHost {
    pub fn new(state: Shared) -> Self {
        let mut windows = HashMap::new();
        windows.insert(CONN, WINDOW);
        windows.insert(OTHER_CONN, WINDOW);
        Self { state, windows }
    }
}

impl SurfaceHost for MockHost {
    type Surface = MockSurface;

    fn resolve_window(&self, connection: ConnectionId) -> Option<WindowId> {
        self.windows.get(&connection).copied()
    }

    fn create_surface(
        &mut self,
        _window: WindowId,
        spec: &SurfaceSpec,
    ) -> Result<MockSurface, NativeError> {
        let mut state = lock(&self.state);
        if state.refuse_create {
            return Err(NativeError::Backend("out of surfaces".into()));
        }
        state.live += 1;
        state
            .calls
            .push((spec.id.clone(), Call::Create(spec.partition.clone())));
        Ok(MockSurface {
            id: spec.id.clone(),
            state: Arc::clone(&self.state),
        })
    }
}

pub struct MockSurface {
    id: SurfaceId,
    state: Shared,
}

impl MockSurface {
    fn record(&self, call: Call) {
        lock(&self.state).calls.push((self.id.clone(), call));
    }
}

impl NativeSurface for MockSurface {
    fn load_url(&mut self, ticket: LoadTicket) -> Result<(), NativeError> {
        let mut state = lock(&self.state);
        if std::mem::take(&mut state.fail_next_load) {
            return Err(NativeError::Backend("load refused".into()));
        }
        state
            .calls
            .push((self.id.clone(), Call::Load(ticket.url().to_string())));
        state.tickets.entry(self.id.clone()).or_default().push(ticket);
        Ok(())
    }

    fn current_url(&self) -> Option<String> {
        lock(&self.state).urls.get(&self.id).cloned()
    }

    fn title(&self) -> Option<String> {
        lock(&self.state).titles.get(&self.id).cloned()
    }

    fn set_bounds(&mut self, bounds: Bounds) -> Result<(), NativeError> {
        self.record(Call::SetBounds(bounds));
        Ok(())
    }

    fn set_ignore_mouse_events(&mut self, ignore: bool, forward: bool) -> Result<(), NativeError> {
        self.record(Call::SetIgnoreMouse { ignore, forward });
        Ok(())
    }

    fn listen(&mut self, sink: EventSink) -> Disposer {
        {
            let mut state = lock(&self.state);
            state.sinks.insert(self.id.clone(), sink);
        }
        self.record(Call::Listen);
        let state = Arc::clone(&self.state);
        let id = self.id.clone();
        Disposer::new(move || {
            let mut state = lock(&state);
            state.sinks.remove(&id);
            state.calls.push((id, Call::Dispose));
        })
    }

    fn detach(&mut self) -> Result<(), NativeError> {
        self.record(Call::Detach);
        Ok(())
    }

    fn release(&mut self) {
        let mut state = lock(&self.state);
        state.live -= 1;
        state.calls.push((self.id.clone(), Call::Release));
    }
}

// =============================================================================
// SHELL
// =============================================================================

#[derive(Debug, Default)]
pub struct ShellLog {
    pub calls: Vec<&'static str>,
    pub maximized: bool,
    pub debug_logging: bool,
}

#[derive(Clone, Default)]
pub struct MockShell {
    pub log: Arc<Mutex<ShellLog>>,
}

impl MockShell {
    fn record(&self, call: &'static str) {
        self.log.lock().unwrap().calls.push(call);
    }
}

impl ShellControls for MockShell {
    fn minimize(&mut self) {
        self.record("minimize");
    }

    fn toggle_maximize(&mut self) {
        let mut log = self.log.lock().unwrap();
        log.maximized = !log.maximized;
        log.calls.push("toggle_maximize");
    }

    fn close(&mut self) {
        self.record("close");
    }

    fn is_maximized(&self) -> bool {
        self.log.lock().unwrap().maximized
    }

    fn start_drag(&mut self) {
        self.record("start_drag");
    }

    fn show(&mut self) {
        self.record("show");
    }

    fn set_debug_logging(&mut self, enabled: bool) -> bool {
        let mut log = self.log.lock().unwrap();
        log.debug_logging = enabled;
        log.calls.push("set_debug_logging");
        enabled
    }

    fn version(&self) -> String {
        "9.9.9-test".into()
    }
}

// =============================================================================
// HARNESS
// =============================================================================

pub struct Harness {
    pub service: SurfaceService<MockHost, MockShell>,
    pub state: Shared,
    pub shell: MockShell,
    pub now: Instant,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_settings(ServiceSettings::default())
    }

    pub fn with_settings(settings: ServiceSettings) -> Self {
        let state: Shared = Arc::default();
        let shell = MockShell::default();
        let service = SurfaceService::new(MockHost::new(Arc::clone(&state)), shell.clone(), settings);
        Self {
            service,
            state,
            shell,
            now: Instant::now(),
        }
    }

    pub fn state(&self) -> MutexGuard<'_, MockState> {
        lock(&self.state)
    }

    /// Send a raw host-UI request from `connection` and process the queue.
    pub fn send_from(&mut self, connection: ConnectionId, kind: &str, payload: Value) {
        self.send_raw(connection, kind, None, payload);
    }

    pub fn send(&mut self, kind: &str, payload: Value) {
        self.send_from(CONN, kind, payload);
    }

    /// Same as [`Harness::send`] with a request id, so a reply is expected.
    pub fn request(&mut self, kind: &str, request_id: u64, payload: Value) {
        self.send_raw(CONN, kind, Some(request_id), payload);
    }

    fn send_raw(&mut self, connection: ConnectionId, kind: &str, request_id: Option<u64>, payload: Value) {
        let mut body = serde_json::json!({ "kind": kind, "payload": payload });
        if let Some(request_id) = request_id {
            body["requestId"] = request_id.into();
        }
        assert!(
            self.service.sender().host_raw(connection, &body.to_string()),
            "request rejected: {body}"
        );
        self.pump();
    }

    pub fn pump(&mut self) -> usize {
        self.service.pump(self.now)
    }

    pub fn advance(&mut self, ms: u64) {
        self.now += Duration::from_millis(ms);
        self.pump();
    }

    pub fn create(&mut self, id: &str) {
        self.send("view:create", serde_json::json!({ "id": id }));
    }

    pub fn load(&mut self, id: &str, url: &str) {
        self.send("view:load", serde_json::json!({ "id": id, "url": url }));
    }

    pub fn destroy(&mut self, id: &str) {
        self.send("view:destroy", serde_json::json!({ "id": id }));
    }

    /// Push a native event through the surface's sink, as the engine would.
    pub fn emit(&mut self, id: &str, event: NativeEvent) {
        let sink = self.state().sinks.get(&SurfaceId::from(id)).cloned();
        sink.unwrap_or_else(|| panic!("no sink for {id}")).emit(event);
        self.pump();
    }

    /// Commit the navigation for the `n`th load issued on `id`.
    pub fn settle(&mut self, id: &str, n: usize, url: &str, title: Option<&str>) {
        let ticket = self.ticket(id, n);
        {
            let mut state = self.state();
            state.urls.insert(SurfaceId::from(id), url.to_string());
            match title {
                Some(t) => state.titles.insert(SurfaceId::from(id), t.to_string()),
                None => state.titles.remove(&SurfaceId::from(id)),
            };
        }
        self.emit(
            id,
            NativeEvent::LoadSettled {
                ticket,
                outcome: NavigationOutcome::Completed,
            },
        );
    }

    pub fn fail(&mut self, id: &str, n: usize, outcome: NavigationOutcome) {
        let ticket = self.ticket(id, n);
        self.emit(id, NativeEvent::LoadSettled { ticket, outcome });
    }

    pub fn ticket(&self, id: &str, n: usize) -> LoadTicket {
        self.state().tickets[&SurfaceId::from(id)][n].clone()
    }

    /// Native calls recorded for `id`, in order.
    pub fn calls(&self, id: &str) -> Vec<Call> {
        self.state()
            .calls
            .iter()
            .filter(|(sid, _)| sid.as_str() == id)
            .map(|(_, c)| c.clone())
            .collect()
    }

    pub fn bounds_applied(&self, id: &str) -> Vec<Bounds> {
        self.calls(id)
            .into_iter()
            .filter_map(|c| match c {
                Call::SetBounds(b) => Some(b),
                _ => None,
            })
            .collect()
    }

    /// Everything queued for the host UI, for every connection.
    pub fn outbound(&mut self) -> Vec<(ConnectionId, HostMessage)> {
        self.service
            .drain_outbound()
            .into_iter()
            .map(|o| (o.connection, o.message))
            .collect()
    }

    pub fn messages(&mut self) -> Vec<HostMessage> {
        self.outbound().into_iter().map(|(_, m)| m).collect()
    }

    pub fn page_infos(&mut self, id: &str) -> Vec<(String, String)> {
        self.messages()
            .into_iter()
            .filter_map(|m| match m {
                HostMessage::PageInfo { id: sid, url, title } if sid.as_str() == id => {
                    Some((url, title))
                }
                _ => None,
            })
            .collect()
    }
}
