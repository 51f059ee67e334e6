pub mod errors;
pub mod id;
pub mod types;

pub use errors::{ConfigError, SurfaceError};
pub use id::new_connection_id;
pub use types::{Bounds, ConnectionId, PlaceholderRect, SurfaceId, WindowId};
