use std::sync::Arc;
use std::time::Instant;

use omni_common::{ConnectionId, SurfaceId};
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::{push_outbound, ShellControls, SurfaceService};
use crate::bounds::Placement;
use crate::ipc::{
    CreatePayload, HostEnvelope, HostMessage, HostRequest, MeasurePayload, OverlayStatePayload,
};
use crate::native::SurfaceHost;
use crate::partition::Partition;
use crate::relay::Subscription;

impl<H: SurfaceHost, C: ShellControls> SurfaceService<H, C> {
    /// Route one host-UI request. Requests that carry a request id get
    /// exactly one reply.
    pub fn handle(&mut self, connection: ConnectionId, envelope: HostEnvelope, now: Instant) {
        self.register_connection(connection);
        let HostEnvelope {
            request_id,
            request,
        } = envelope;
        debug!(%connection, kind = request.kind(), ?request_id, "host request");

        let result = self.route(connection, request, now);
        if let Some(request_id) = request_id {
            let message = match result {
                Ok(value) => HostMessage::reply_ok(request_id, value),
                Err(error) => HostMessage::reply_err(request_id, error),
            };
            self.reply(connection, message);
        }
    }

    fn route(
        &mut self,
        connection: ConnectionId,
        request: HostRequest,
        now: Instant,
    ) -> Result<Value, String> {
        match request {
            HostRequest::Create(p) => return self.create(connection, p, now),
            HostRequest::Load(p) => {
                if self.may_target(connection, &p.id, "load") {
                    self.controller.load(&p.id, &p.url);
                }
            }
            HostRequest::SetBounds(p) => {
                if self.may_target(connection, &p.id, "set-bounds") {
                    self.bounds.set_bounds(&p.id, p.bounds, now);
                    self.place_or_stage(&p.id, now);
                }
            }
            HostRequest::Measure(p) => self.measure(connection, p, now),
            HostRequest::Destroy(p) => {
                if self.may_target(connection, &p.id, "destroy") {
                    self.teardown(&p.id);
                }
            }
            HostRequest::SetIgnoreMouseEvents(p) => {
                if self.may_target(connection, &p.id, "set-ignore-mouse-events") {
                    self.controller
                        .set_ignore_mouse_events(&p.id, p.ignore, p.forward);
                }
            }
            HostRequest::OverlayState(p) => self.overlay_state(connection, p, now),
            HostRequest::GetVersion => return Ok(json!(self.shell.version())),
            HostRequest::SetDebugLogging(p) => {
                if !self.settings.debug_ui_toggle {
                    debug!("debug logging toggle disabled by config");
                    return Ok(json!(false));
                }
                return Ok(json!(self.shell.set_debug_logging(p.enabled)));
            }
            HostRequest::Ready => self.shell.show(),
            HostRequest::WindowMinimize => self.shell.minimize(),
            HostRequest::WindowToggleMaximize => self.shell.toggle_maximize(),
            HostRequest::WindowClose => self.shell.close(),
            HostRequest::WindowIsMaximized => return Ok(json!(self.shell.is_maximized())),
            HostRequest::WindowStartDrag => self.shell.start_drag(),
        }
        Ok(Value::Null)
    }

    /// Requests for a surface owned by another connection are treated like
    /// requests for an unknown id.
    fn may_target(&self, connection: ConnectionId, id: &SurfaceId, op: &str) -> bool {
        match self.controller.owner_of(id) {
            Some(owner) if owner != connection => {
                warn!(surface_id = %id, %connection, %owner, op, "request from non-owner ignored");
                false
            }
            _ => true,
        }
    }

    fn create(
        &mut self,
        connection: ConnectionId,
        p: CreatePayload,
        now: Instant,
    ) -> Result<Value, String> {
        if let Some(owner) = self.controller.owner_of(&p.id) {
            if owner != connection {
                warn!(surface_id = %p.id, %connection, %owner, "create for id owned elsewhere ignored");
            } else {
                debug!(surface_id = %p.id, "create ignored: surface already exists");
            }
            return Ok(Value::Null);
        }

        let raw_partition = p
            .partition
            .as_deref()
            .or(self.settings.default_partition.as_deref());
        let partition = Partition::parse(raw_partition);

        // Subscribed first so the initial page info reaches the owner.
        let subs = self.subscribe_forwarders(connection, &p.id);
        match self.controller.create(connection, p.id.clone(), partition) {
            Ok(()) => {
                self.forwarders.insert(p.id.clone(), subs);
                if let Some(bounds) = self.bounds.flush_now(&p.id, now) {
                    self.controller.set_bounds(&p.id, bounds);
                }
                Ok(Value::Null)
            }
            Err(e) => {
                subs.into_iter().for_each(Subscription::unsubscribe);
                Err(e.to_string())
            }
        }
    }

    fn measure(&mut self, connection: ConnectionId, p: MeasurePayload, now: Instant) {
        if !self.may_target(connection, &p.id, "measure") {
            return;
        }
        let defaults = self.settings.placement;
        let placement = Placement {
            left_offset: p.left_offset.unwrap_or(defaults.left_offset),
            top_offset: p.top_offset.unwrap_or(defaults.top_offset),
            active: p.active,
        };
        self.bounds.measure(&p.id, p.rect, placement, now);
        self.place_or_stage(&p.id, now);
    }

    /// Geometry for an id that has not been created is held briefly for a
    /// following create. A surface that has never been positioned gets its
    /// first bounds without waiting for the debounce window.
    fn place_or_stage(&mut self, id: &SurfaceId, now: Instant) {
        if !self.controller.contains(id) {
            self.bounds.stage(id, now);
            return;
        }
        let unplaced = self
            .controller
            .registry()
            .get(id)
            .is_some_and(|e| e.bounds().is_none());
        if unplaced {
            if let Some(bounds) = self.bounds.flush_now(id, now) {
                self.controller.set_bounds(id, bounds);
            }
        }
    }

    fn overlay_state(&mut self, connection: ConnectionId, p: OverlayStatePayload, now: Instant) {
        if !self.may_target(connection, &p.id, "overlay-state") {
            return;
        }
        if !self.controller.contains(&p.id) {
            debug!(surface_id = %p.id, "overlay state ignored: unknown surface");
            return;
        }
        if let Some(change) = self.passthrough.report(&p.id, p.overlay_active, p.active) {
            self.controller
                .set_ignore_mouse_events(&p.id, change.ignore, change.forward);
        }
        // Inactive views are parked at zero area, not destroyed.
        self.bounds.set_active(&p.id, p.active, now);
    }

    /// Unmount path: drop pending bounds, restore input, unsubscribe the
    /// owner's forwarders, then destroy the surface.
    pub(super) fn teardown(&mut self, id: &SurfaceId) {
        self.bounds.forget(id);
        if let Some(change) = self.passthrough.release(id) {
            self.controller
                .set_ignore_mouse_events(id, change.ignore, change.forward);
        }
        if let Some(subs) = self.forwarders.remove(id) {
            subs.into_iter().for_each(Subscription::unsubscribe);
        }
        self.controller.destroy(id);
    }

    fn subscribe_forwarders(&self, connection: ConnectionId, id: &SurfaceId) -> Vec<Subscription> {
        let relay = self.controller.relay();

        let outbox = Arc::clone(&self.outbox);
        let loading_id = id.clone();
        let loading = relay.subscribe_loading(id.clone(), move |is_loading: &bool| {
            push_outbound(
                &outbox,
                connection,
                HostMessage::Loading {
                    id: loading_id.clone(),
                    is_loading: *is_loading,
                },
            );
        });

        let outbox = Arc::clone(&self.outbox);
        let info_id = id.clone();
        let page_info = relay.subscribe_page_info(id.clone(), move |info| {
            push_outbound(
                &outbox,
                connection,
                HostMessage::PageInfo {
                    id: info_id.clone(),
                    url: info.url.clone(),
                    title: info.title.clone(),
                },
            );
        });

        vec![loading, page_info]
    }
}
