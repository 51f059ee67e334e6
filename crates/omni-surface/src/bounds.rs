//! Placeholder geometry to surface bounds, with per-surface coalescing.
//!
//! The host UI reports placeholder measurements far faster than a native
//! surface can usefully re-layout. Each surface gets a single slot holding
//! the latest target; the slot is flushed once its debounce window elapses.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use omni_common::{Bounds, PlaceholderRect, SurfaceId};

/// One animation frame.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(16);

/// Fixed chrome around the placeholder plus the view's visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Width of chrome to the left of the placeholder's coordinate space.
    pub left_offset: i32,
    /// Height of chrome above it.
    pub top_offset: i32,
    /// Inactive views are parked at zero size instead of being destroyed.
    pub active: bool,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            left_offset: 0,
            top_offset: 0,
            active: true,
        }
    }
}

impl Placement {
    pub fn new(left_offset: i32, top_offset: i32) -> Self {
        Self {
            left_offset,
            top_offset,
            active: true,
        }
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}

/// Convert a measured placeholder rectangle into absolute surface bounds.
pub fn compute_bounds(rect: &PlaceholderRect, placement: &Placement) -> Bounds {
    if !placement.active {
        return Bounds::hidden();
    }
    let x = floor_non_negative(rect.left) + i64::from(placement.left_offset);
    let y = floor_non_negative(rect.top) + i64::from(placement.top_offset);
    Bounds {
        x: clamp_u32(x),
        y: clamp_u32(y),
        width: clamp_u32(floor_non_negative(rect.width)).max(1),
        height: clamp_u32(floor_non_negative(rect.height)).max(1),
    }
}

fn floor_non_negative(v: f64) -> i64 {
    if v.is_nan() {
        return 0;
    }
    // `as` saturates on out-of-range floats.
    (v.floor() as i64).max(0)
}

fn clamp_u32(v: i64) -> u32 {
    v.clamp(0, i64::from(u32::MAX)) as u32
}

// =============================================================================
// COALESCER
// =============================================================================

#[derive(Debug, Clone, Copy)]
struct Slot<T> {
    deadline: Instant,
    value: T,
}

/// Single-slot "latest pending value" queue per key.
///
/// The first push opens a window; later pushes inside it only replace the
/// value, so a stream of updates yields one flush carrying the last one.
#[derive(Debug)]
pub struct BoundsCoalescer<T = Bounds> {
    window: Duration,
    slots: HashMap<SurfaceId, Slot<T>>,
}

impl<T: Copy> BoundsCoalescer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            slots: HashMap::new(),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn push(&mut self, id: SurfaceId, value: T, now: Instant) {
        let deadline = now + self.window;
        self.slots
            .entry(id)
            .and_modify(|slot| slot.value = value)
            .or_insert(Slot { deadline, value });
    }

    /// Remove and return every slot whose window has elapsed, ordered by id.
    pub fn take_due(&mut self, now: Instant) -> Vec<(SurfaceId, T)> {
        let mut due: Vec<SurfaceId> = self
            .slots
            .iter()
            .filter(|(_, slot)| slot.deadline <= now)
            .map(|(id, _)| id.clone())
            .collect();
        due.sort();
        due.into_iter()
            .filter_map(|id| self.slots.remove(&id).map(|slot| (id, slot.value)))
            .collect()
    }

    /// Remove the slot regardless of its deadline.
    pub fn take(&mut self, id: &SurfaceId) -> Option<T> {
        self.slots.remove(id).map(|slot| slot.value)
    }

    pub fn cancel(&mut self, id: &SurfaceId) -> bool {
        self.slots.remove(id).is_some()
    }

    pub fn is_pending(&self, id: &SurfaceId) -> bool {
        self.slots.contains_key(id)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.slots.values().map(|slot| slot.deadline).min()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

// =============================================================================
// SYNCHRONIZER
// =============================================================================

/// Most measurements held for surfaces that do not exist yet.
pub const MAX_STAGED: usize = 32;

/// How long a measurement for a not-yet-created surface is kept.
pub const STAGED_TTL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, Default)]
struct Tracked {
    rect: Option<PlaceholderRect>,
    placement: Placement,
    target: Option<Bounds>,
    applied: Option<Bounds>,
    /// Set while the surface has not been created.
    staged_at: Option<Instant>,
    staged_seq: u64,
}

/// Tracks the latest measurement per surface and decides what to push.
#[derive(Debug)]
pub struct BoundsSynchronizer {
    pending: BoundsCoalescer<Bounds>,
    tracked: HashMap<SurfaceId, Tracked>,
    default_placement: Placement,
    next_seq: u64,
}

impl BoundsSynchronizer {
    pub fn new(window: Duration, default_placement: Placement) -> Self {
        Self {
            pending: BoundsCoalescer::new(window),
            tracked: HashMap::new(),
            default_placement,
            next_seq: 0,
        }
    }

    fn tracked(&mut self, id: &SurfaceId) -> &mut Tracked {
        let placement = self.default_placement;
        self.tracked.entry(id.clone()).or_insert_with(|| Tracked {
            placement,
            ..Tracked::default()
        })
    }

    /// Record a placeholder measurement and schedule the resulting bounds.
    pub fn measure(
        &mut self,
        id: &SurfaceId,
        rect: PlaceholderRect,
        placement: Placement,
        now: Instant,
    ) -> Bounds {
        let bounds = compute_bounds(&rect, &placement);
        let tracked = self.tracked(id);
        tracked.rect = Some(rect);
        tracked.placement = placement;
        tracked.target = Some(bounds);
        self.pending.push(id.clone(), bounds, now);
        bounds
    }

    /// Schedule already-absolute bounds.
    /// Width and height are floored to one; zero area means parked.
    pub fn set_bounds(&mut self, id: &SurfaceId, bounds: Bounds, now: Instant) {
        let bounds = Bounds {
            width: bounds.width.max(1),
            height: bounds.height.max(1),
            ..bounds
        };
        let tracked = self.tracked(id);
        tracked.rect = None;
        tracked.target = Some(bounds);
        self.pending.push(id.clone(), bounds, now);
    }

    /// Flip a view between shown and parked, reusing its last measurement.
    pub fn set_active(&mut self, id: &SurfaceId, active: bool, now: Instant) -> Option<Bounds> {
        let tracked = self.tracked(id);
        if tracked.placement.active == active {
            return None;
        }
        tracked.placement.active = active;
        let bounds = match tracked.rect {
            Some(rect) => Some(compute_bounds(&rect, &tracked.placement)),
            None if !active => Some(Bounds::hidden()),
            None => tracked.applied.filter(|b| !b.is_hidden()),
        };
        tracked.target = bounds;
        match bounds {
            Some(bounds) => self.pending.push(id.clone(), bounds, now),
            // Nothing to restore; a queued park must not land on an active view.
            None => {
                self.pending.cancel(id);
            }
        }
        bounds
    }

    /// Bounds whose debounce window has elapsed and that differ from what
    /// was last applied.
    pub fn due(&mut self, now: Instant) -> Vec<(SurfaceId, Bounds)> {
        self.sweep_staged(now);
        let mut out = Vec::new();
        for (id, bounds) in self.pending.take_due(now) {
            let tracked = self.tracked(&id);
            if tracked.applied == Some(bounds) {
                continue;
            }
            tracked.applied = Some(bounds);
            out.push((id, bounds));
        }
        out
    }

    /// Cancel the pending flush for `id` and return its latest target now.
    /// Used for the initial push right after a surface is created. A staged
    /// measurement older than [`STAGED_TTL`] is discarded instead.
    pub fn flush_now(&mut self, id: &SurfaceId, now: Instant) -> Option<Bounds> {
        self.pending.cancel(id);
        let expired = self.tracked.get(id)?.staged_at.is_some_and(|at| {
            now.saturating_duration_since(at) > STAGED_TTL
        });
        if expired {
            self.tracked.remove(id);
            return None;
        }
        let tracked = self.tracked.get_mut(id)?;
        tracked.staged_at = None;
        let bounds = tracked.target?;
        tracked.applied = Some(bounds);
        Some(bounds)
    }

    /// Hold the latest measurement for a surface that does not exist yet.
    /// Nothing is pushed; [`flush_now`](Self::flush_now) picks it up at
    /// create if it is still fresh.
    pub fn stage(&mut self, id: &SurfaceId, now: Instant) {
        self.pending.cancel(id);
        let seq = self.next_seq;
        self.next_seq += 1;
        if let Some(tracked) = self.tracked.get_mut(id) {
            tracked.staged_at = Some(now);
            tracked.staged_seq = seq;
        }
        self.sweep_staged(now);
    }

    /// Drop expired staged entries, then the oldest ones beyond [`MAX_STAGED`].
    fn sweep_staged(&mut self, now: Instant) {
        self.tracked.retain(|_, t| {
            t.staged_at
                .map_or(true, |at| now.saturating_duration_since(at) <= STAGED_TTL)
        });
        let mut staged: Vec<(u64, SurfaceId)> = self
            .tracked
            .iter()
            .filter(|(_, t)| t.staged_at.is_some())
            .map(|(id, t)| (t.staged_seq, id.clone()))
            .collect();
        if staged.len() <= MAX_STAGED {
            return;
        }
        staged.sort();
        let excess = staged.len() - MAX_STAGED;
        for (_, id) in staged.into_iter().take(excess) {
            self.tracked.remove(&id);
        }
    }

    /// Cancel any pending push without forgetting the measurement.
    pub fn cancel(&mut self, id: &SurfaceId) -> bool {
        self.pending.cancel(id)
    }

    /// Drop all state for a destroyed surface.
    pub fn forget(&mut self, id: &SurfaceId) {
        self.pending.cancel(id);
        self.tracked.remove(id);
    }

    pub fn is_pending(&self, id: &SurfaceId) -> bool {
        self.pending.is_pending(id)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.next_deadline()
    }

    /// Number of surfaces with retained geometry.
    pub fn tracked_len(&self) -> usize {
        self.tracked.len()
    }
}

impl Default for BoundsSynchronizer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE, Placement::default())
    }
}

// =============================================================================
// TESTS
// =============================================================================
