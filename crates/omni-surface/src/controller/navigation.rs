use omni_common::SurfaceId;
use tracing::{debug, warn};

use super::SurfaceController;
use crate::native::{
    LoadTicket, NativeEvent, NativeSurface, NavigationOutcome, SurfaceHost, ERR_ABORTED,
};
use crate::registry::RegistryEntry;
use crate::relay::EventRelay;

impl<H: SurfaceHost> SurfaceController<H> {
    /// Start navigating `id` to `url`. Returns `false` for an unknown id.
    ///
    /// The load is not awaited: its outcome arrives later as
    /// [`NativeEvent::LoadSettled`]. Any earlier load still in flight is
    /// superseded and its settlement will be discarded.
    pub fn load(&mut self, id: &SurfaceId, url: &str) -> bool {
        let Some(entry) = self.registry.get_mut(id) else {
            warn!(surface_id = %id, url, "load ignored: unknown surface");
            return false;
        };

        self.next_ticket += 1;
        let ticket = LoadTicket::new(self.next_ticket, url);
        if let Some(previous) = entry.pending_load.replace(ticket.clone()) {
            debug!(surface_id = %id, superseded = previous.url(), url, "load superseded");
        }
        set_loading(&self.relay, entry, true);

        if let Err(e) = entry.surface.load_url(ticket.clone()) {
            warn!(surface_id = %id, url, error = %e, "navigation could not start");
            let outcome = NavigationOutcome::Failed {
                code: 0,
                description: e.to_string(),
            };
            self.settle(id, ticket, outcome);
        }
        true
    }

    /// Apply one native event reported for `id`. Events for ids that are
    /// no longer registered are dropped.
    pub fn handle_native(&mut self, id: &SurfaceId, event: NativeEvent) {
        if let NativeEvent::LoadSettled { ticket, outcome } = event {
            self.settle(id, ticket, outcome);
            return;
        }

        let Some(entry) = self.registry.get_mut(id) else {
            debug!(surface_id = %id, ?event, "native event for unknown surface dropped");
            return;
        };

        match event {
            NativeEvent::DidStartLoading => set_loading(&self.relay, entry, true),
            NativeEvent::DidStopLoading => {
                set_loading(&self.relay, entry, false);
                if let Some(url) = entry.surface.current_url() {
                    entry.last_known_url = Some(url);
                }
                if let Some(title) = entry.surface.title() {
                    entry.last_known_title = Some(title);
                }
                publish_page_info(&self.relay, entry);
            }
            NativeEvent::DidFailLoad {
                code,
                description,
                url,
            } => {
                if code == ERR_ABORTED {
                    debug!(surface_id = %id, %url, "navigation aborted");
                    return;
                }
                warn!(surface_id = %id, code, %description, %url, "navigation failed");
                // Loads started through `load` are finished by their ticket.
                if entry.pending_load.is_none() {
                    set_loading(&self.relay, entry, false);
                    if !url.is_empty() {
                        entry.last_known_url = Some(url);
                    }
                    publish_page_info(&self.relay, entry);
                }
            }
            NativeEvent::PageTitleUpdated(title) => {
                entry.last_known_title = Some(title);
                publish_page_info(&self.relay, entry);
            }
            NativeEvent::DidNavigate(url) => {
                entry.last_known_url = Some(url);
                entry.last_known_title = entry.surface.title();
                publish_page_info(&self.relay, entry);
            }
            NativeEvent::DidNavigateInPage(url) => {
                entry.last_known_url = Some(url);
                publish_page_info(&self.relay, entry);
            }
            NativeEvent::LoadSettled { .. } => {}
        }
    }

    /// Finish the load identified by `ticket`. A ticket that is not the
    /// entry's latest (superseded, or the entry is gone) is discarded.
    fn settle(&mut self, id: &SurfaceId, ticket: LoadTicket, outcome: NavigationOutcome) {
        let Some(entry) = self.registry.get_mut(id) else {
            debug!(surface_id = %id, url = ticket.url(), "load settled after destroy; ignored");
            return;
        };
        if entry.pending_load.as_ref().map(LoadTicket::seq) != Some(ticket.seq()) {
            debug!(surface_id = %id, url = ticket.url(), "stale load result discarded");
            return;
        }
        entry.pending_load = None;

        match &outcome {
            NavigationOutcome::Completed => {
                entry.last_known_url = entry
                    .surface
                    .current_url()
                    .or_else(|| Some(ticket.url().to_string()));
                entry.last_known_title = entry.surface.title();
            }
            NavigationOutcome::Aborted => {
                debug!(surface_id = %id, url = ticket.url(), "load aborted");
                entry.last_known_url = Some(ticket.url().to_string());
                entry.last_known_title = None;
            }
            NavigationOutcome::Failed { code, description } => {
                warn!(surface_id = %id, url = ticket.url(), code, %description, "load failed");
                entry.last_known_url = Some(ticket.url().to_string());
                entry.last_known_title = None;
            }
        }

        set_loading(&self.relay, entry, false);
        publish_page_info(&self.relay, entry);
    }
}

/// Publish the loading state only when it changes.
fn set_loading<S>(relay: &EventRelay, entry: &mut RegistryEntry<S>, is_loading: bool) {
    if entry.is_loading == is_loading {
        return;
    }
    entry.is_loading = is_loading;
    relay.publish_loading(&entry.id, is_loading);
}

/// Publish the entry's page info unless it is blank or unchanged.
pub(super) fn publish_page_info<S>(relay: &EventRelay, entry: &mut RegistryEntry<S>) {
    let Some(info) = entry.page_info() else {
        debug!(surface_id = %entry.id, "page info suppressed: blank page");
        return;
    };
    if entry.last_published.as_ref() == Some(&info) {
        return;
    }
    relay.publish_page_info(&entry.id, &info);
    entry.last_published = Some(info);
}
