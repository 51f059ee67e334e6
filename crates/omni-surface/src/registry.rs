//! Table of live surfaces, keyed by surface id.

use std::collections::HashMap;

use omni_common::{Bounds, ConnectionId, SurfaceId, WindowId};

use crate::events::PageInfo;
use crate::native::{Disposer, LoadTicket};
use crate::partition::Partition;

/// One live surface and the state the controller keeps about it.
pub struct RegistryEntry<S> {
    pub(crate) id: SurfaceId,
    pub(crate) surface: S,
    pub(crate) owner: ConnectionId,
    pub(crate) window: WindowId,
    pub(crate) partition: Partition,
    /// Run once each at destroy time.
    pub(crate) disposers: Vec<Disposer>,
    /// Cached for late subscribers.
    pub(crate) last_known_url: Option<String>,
    pub(crate) last_known_title: Option<String>,
    pub(crate) is_loading: bool,
    /// Ticket of the most recent `load`; older settlements are discarded.
    pub(crate) pending_load: Option<LoadTicket>,
    pub(crate) last_published: Option<PageInfo>,
    pub(crate) ignore_mouse: bool,
    pub(crate) bounds: Option<Bounds>,
}

impl<S> RegistryEntry<S> {
    pub(crate) fn new(
        id: SurfaceId,
        surface: S,
        owner: ConnectionId,
        window: WindowId,
        partition: Partition,
    ) -> Self {
        Self {
            id,
            surface,
            owner,
            window,
            partition,
            disposers: Vec::new(),
            last_known_url: None,
            last_known_title: None,
            is_loading: false,
            pending_load: None,
            last_published: None,
            ignore_mouse: false,
            bounds: None,
        }
    }

    pub fn id(&self) -> &SurfaceId {
        &self.id
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn owner(&self) -> ConnectionId {
        self.owner
    }

    pub fn window(&self) -> WindowId {
        self.window
    }

    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    pub fn last_known_url(&self) -> Option<&str> {
        self.last_known_url.as_deref()
    }

    pub fn last_known_title(&self) -> Option<&str> {
        self.last_known_title.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn pending_load(&self) -> Option<&LoadTicket> {
        self.pending_load.as_ref()
    }

    pub fn ignores_mouse(&self) -> bool {
        self.ignore_mouse
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    /// Page info as the host UI would see it right now.
    pub fn page_info(&self) -> Option<PageInfo> {
        PageInfo::resolve(
            self.last_known_url.as_deref(),
            self.last_known_title.as_deref(),
        )
    }
}

/// At most one entry per id.
pub struct SurfaceRegistry<S> {
    entries: HashMap<SurfaceId, RegistryEntry<S>>,
}

impl<S> Default for SurfaceRegistry<S> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<S> SurfaceRegistry<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &SurfaceId) -> Option<&RegistryEntry<S>> {
        self.entries.get(id)
    }

    pub fn get_mut(&mut self, id: &SurfaceId) -> Option<&mut RegistryEntry<S>> {
        self.entries.get_mut(id)
    }

    pub fn contains(&self, id: &SurfaceId) -> bool {
        self.entries.contains_key(id)
    }

    /// Insert a new entry. An occupied id is left untouched and the rejected
    /// entry is handed back.
    pub fn put(&mut self, entry: RegistryEntry<S>) -> Result<(), RegistryEntry<S>> {
        if self.entries.contains_key(&entry.id) {
            return Err(entry);
        }
        self.entries.insert(entry.id.clone(), entry);
        Ok(())
    }

    /// Drop the entry. Callers release the native surface first.
    pub fn remove(&mut self, id: &SurfaceId) -> Option<RegistryEntry<S>> {
        self.entries.remove(id)
    }

    /// Ids of all live surfaces, sorted for deterministic iteration.
    pub fn ids(&self) -> Vec<SurfaceId> {
        let mut ids: Vec<SurfaceId> = self.entries.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, tag: u8) -> RegistryEntry<u8> {
        RegistryEntry::new(
            SurfaceId::from(id),
            tag,
            ConnectionId(1),
            WindowId(1),
            Partition::Default,
        )
    }

    #[test]
    fn put_then_get() {
        let mut reg = SurfaceRegistry::new();
        assert!(reg.put(entry("a", 1)).is_ok());
        let e = reg.get(&SurfaceId::from("a")).unwrap();
        assert_eq!(*e.surface(), 1);
        assert_eq!(e.owner(), ConnectionId(1));
        assert!(!e.is_loading());
    }

    #[test]
    fn put_on_occupied_id_keeps_the_original() {
        let mut reg = SurfaceRegistry::new();
        reg.put(entry("a", 1)).ok();
        let rejected = reg.put(entry("a", 2)).err().unwrap();
        assert_eq!(*rejected.surface(), 2);
        assert_eq!(reg.len(), 1);
        assert_eq!(*reg.get(&SurfaceId::from("a")).unwrap().surface(), 1);
    }

    #[test]
    fn remove_unknown_is_none() {
        let mut reg: SurfaceRegistry<u8> = SurfaceRegistry::new();
        assert!(reg.remove(&SurfaceId::from("nope")).is_none());
        assert!(reg.is_empty());
    }

    #[test]
    fn ids_are_sorted() {
        let mut reg = SurfaceRegistry::new();
        reg.put(entry("c", 0)).ok();
        reg.put(entry("a", 0)).ok();
        reg.put(entry("b", 0)).ok();
        let ids: Vec<String> = reg.ids().iter().map(|i| i.to_string()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn page_info_uses_cached_values() {
        let mut e = entry("a", 0);
        assert!(e.page_info().is_none());
        e.last_known_url = Some("https://example.com".into());
        assert_eq!(e.page_info().unwrap().title, "https://example.com");
        e.last_known_title = Some("Example".into());
        assert_eq!(e.page_info().unwrap().title, "Example");
    }
}
