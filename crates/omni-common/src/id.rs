use std::sync::atomic::{AtomicU32, Ordering};

use crate::types::ConnectionId;

static NEXT_CONNECTION: AtomicU32 = AtomicU32::new(1);

/// Allocate a process-unique connection id.
pub fn new_connection_id() -> ConnectionId {
    ConnectionId(NEXT_CONNECTION.fetch_add(1, Ordering::Relaxed))
}
