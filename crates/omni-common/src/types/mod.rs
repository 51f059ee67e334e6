mod geometry;
mod identity;

pub use geometry::{Bounds, PlaceholderRect};
pub use identity::{ConnectionId, SurfaceId, WindowId};
