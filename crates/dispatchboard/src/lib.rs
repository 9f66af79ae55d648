//! Client-side real-time synchronization and command-routing core for a
//! trucking dispatch dashboard: a declarative route table, a keyboard-
//! driven command palette, a reconnecting live channel client, and the
//! cache invalidation router that keeps fetched views fresh.

pub mod bus;
pub mod cache;
pub mod commands;
pub mod config;
pub mod error;
pub mod invalidation;
pub mod live;
pub mod routes;
pub mod server;

pub use crate::bus::Bus;
pub use crate::cache::{QueryCache, QueryKey};
pub use crate::commands::{CommandRegistry, KeyOutcome, PaletteController, PaletteKey};
pub use crate::config::LiveConfig;
pub use crate::error::{CoreError, CoreResult};
pub use crate::invalidation::InvalidationRouter;
pub use crate::live::{ConnectionState, LiveChannelClient, LiveMessage, MessageTag, WsTransport};
pub use crate::routes::{RouteDescriptor, RouteTable};
pub use crate::server::LiveServer;
