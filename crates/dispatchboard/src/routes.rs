//! Declarative route registry for the dashboard navigation surface.

pub mod descriptor;
pub mod table;

pub use descriptor::RouteDescriptor;
pub use table::{keys, RouteTable, NOT_FOUND_PATH};
