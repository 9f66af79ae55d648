//! Live channel: connection management and inbound message dispatch.

pub mod client;
pub mod message;
pub mod transport;

pub use client::{ConnectionState, LiveChannelClient};
pub use message::{LiveMessage, MessageTag};
pub use transport::{FrameSink, FrameStream, Transport, WsTransport};
