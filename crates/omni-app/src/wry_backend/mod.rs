//! wry/winit implementation of the native surface boundary.

mod external;
mod host;
mod host_ui;
mod surface;

pub use host::{PartitionRoots, WryHost};
pub use host_ui::{HostUi, ShellPageConfig};
pub use surface::SurfaceOptions;
