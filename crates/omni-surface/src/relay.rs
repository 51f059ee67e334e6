//! Publish/subscribe fan-out of surface and window events.
//!
//! Two per-surface channels (loading state, page info) and one global
//! channel (window maximized). A listener that panics is isolated: the
//! remaining listeners for that event still run and the publisher never
//! sees the panic.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use omni_common::SurfaceId;
use tracing::{debug, warn};

use crate::events::PageInfo;

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Loading,
    PageInfo,
    WindowMaximized,
}

struct Topic<T> {
    listeners: HashMap<SurfaceId, Vec<(u64, Listener<T>)>>,
}

impl<T> Default for Topic<T> {
    fn default() -> Self {
        Self {
            listeners: HashMap::new(),
        }
    }
}

impl<T> Topic<T> {
    fn add(&mut self, id: SurfaceId, key: u64, listener: Listener<T>) {
        self.listeners.entry(id).or_default().push((key, listener));
    }

    fn remove(&mut self, id: &SurfaceId, key: u64) -> bool {
        let Some(set) = self.listeners.get_mut(id) else {
            return false;
        };
        let before = set.len();
        set.retain(|(k, _)| *k != key);
        let removed = set.len() != before;
        if set.is_empty() {
            self.listeners.remove(id);
        }
        removed
    }

    fn snapshot(&self, id: &SurfaceId) -> Vec<Listener<T>> {
        self.listeners
            .get(id)
            .map(|set| set.iter().map(|(_, l)| Arc::clone(l)).collect())
            .unwrap_or_default()
    }
}

#[derive(Default)]
struct RelayState {
    next_key: u64,
    loading: Topic<bool>,
    page_info: Topic<PageInfo>,
    maximized: Vec<(u64, Listener<bool>)>,
}

impl RelayState {
    fn key(&mut self) -> u64 {
        self.next_key += 1;
        self.next_key
    }
}

/// Shared handle to the relay. Clones observe the same listener sets.
#[derive(Clone, Default)]
pub struct EventRelay {
    state: Arc<Mutex<RelayState>>,
}

/// Returned by every `subscribe_*` call. Dropping it keeps the listener
/// registered; call [`Subscription::unsubscribe`] to remove it.
#[must_use = "a subscription must be kept to be able to unsubscribe"]
#[derive(Debug)]
pub struct Subscription {
    state: Weak<Mutex<RelayState>>,
    channel: Channel,
    id: Option<SurfaceId>,
    key: u64,
}

impl Subscription {
    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Remove exactly the listener this subscription was created for.
    pub fn unsubscribe(self) {
        let Some(state) = self.state.upgrade() else {
            return;
        };
        let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
        match (self.channel, &self.id) {
            (Channel::Loading, Some(id)) => {
                state.loading.remove(id, self.key);
            }
            (Channel::PageInfo, Some(id)) => {
                state.page_info.remove(id, self.key);
            }
            (Channel::WindowMaximized, _) => {
                state.maximized.retain(|(k, _)| *k != self.key);
            }
            _ => {}
        }
    }
}

impl EventRelay {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RelayState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn subscription(&self, channel: Channel, id: Option<SurfaceId>, key: u64) -> Subscription {
        Subscription {
            state: Arc::downgrade(&self.state),
            channel,
            id,
            key,
        }
    }

    pub fn subscribe_loading(
        &self,
        id: SurfaceId,
        listener: impl Fn(&bool) + Send + Sync + 'static,
    ) -> Subscription {
        let mut state = self.lock();
        let key = state.key();
        state.loading.add(id.clone(), key, Arc::new(listener));
        drop(state);
        self.subscription(Channel::Loading, Some(id), key)
    }

    pub fn subscribe_page_info(
        &self,
        id: SurfaceId,
        listener: impl Fn(&PageInfo) + Send + Sync + 'static,
    ) -> Subscription {
        let mut state = self.lock();
        let key = state.key();
        state.page_info.add(id.clone(), key, Arc::new(listener));
        drop(state);
        self.subscription(Channel::PageInfo, Some(id), key)
    }

    pub fn subscribe_window_maximized(
        &self,
        listener: impl Fn(&bool) + Send + Sync + 'static,
    ) -> Subscription {
        let mut state = self.lock();
        let key = state.key();
        state.maximized.push((key, Arc::new(listener)));
        drop(state);
        self.subscription(Channel::WindowMaximized, None, key)
    }

    /// Deliver to every loading listener of `id`. Returns how many ran
    /// without panicking.
    pub fn publish_loading(&self, id: &SurfaceId, is_loading: bool) -> usize {
        let listeners = self.lock().loading.snapshot(id);
        debug!(surface_id = %id, is_loading, listeners = listeners.len(), "relay loading");
        deliver(Channel::Loading, &listeners, &is_loading)
    }

    pub fn publish_page_info(&self, id: &SurfaceId, info: &PageInfo) -> usize {
        let listeners = self.lock().page_info.snapshot(id);
        debug!(
            surface_id = %id,
            url = %info.url,
            title = %info.title,
            listeners = listeners.len(),
            "relay page info"
        );
        deliver(Channel::PageInfo, &listeners, info)
    }

    pub fn publish_window_maximized(&self, maximized: bool) -> usize {
        let listeners: Vec<Listener<bool>> = self
            .lock()
            .maximized
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        debug!(maximized, listeners = listeners.len(), "relay window maximized");
        deliver(Channel::WindowMaximized, &listeners, &maximized)
    }

    /// Number of listeners on a channel. `id` is ignored for the global channel.
    pub fn listener_count(&self, channel: Channel, id: &SurfaceId) -> usize {
        let state = self.lock();
        match channel {
            Channel::Loading => state.loading.listeners.get(id).map_or(0, Vec::len),
            Channel::PageInfo => state.page_info.listeners.get(id).map_or(0, Vec::len),
            Channel::WindowMaximized => state.maximized.len(),
        }
    }

    /// Whether the per-id map holds a key for `id` at all.
    pub fn has_entry(&self, channel: Channel, id: &SurfaceId) -> bool {
        let state = self.lock();
        match channel {
            Channel::Loading => state.loading.listeners.contains_key(id),
            Channel::PageInfo => state.page_info.listeners.contains_key(id),
            Channel::WindowMaximized => !state.maximized.is_empty(),
        }
    }
}

fn deliver<T>(channel: Channel, listeners: &[Listener<T>], value: &T) -> usize {
    let mut delivered = 0;
    for listener in listeners {
        match catch_unwind(AssertUnwindSafe(|| listener(value))) {
            Ok(()) => delivered += 1,
            Err(_) => warn!(?channel, "relay listener panicked; continuing with the rest"),
        }
    }
    delivered
}

// =============================================================================
// TESTS
// =============================================================================
