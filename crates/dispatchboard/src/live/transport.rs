//! Transport seam between the live channel client and the wire.
//!
//! The client only ever sees text frames through these traits; the
//! default implementation speaks WebSocket via tokio-tungstenite, and
//! tests substitute scripted in-memory transports.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;

use crate::error::{CoreError, CoreResult};

/// Write half of an open connection.
#[async_trait]
pub trait FrameSink: Send {
    async fn send_text(&mut self, text: String) -> CoreResult<()>;
    async fn close(&mut self);
}

/// Read half of an open connection. `None` means the peer closed.
#[async_trait]
pub trait FrameStream: Send {
    async fn next_text(&mut self) -> Option<CoreResult<String>>;
}

/// Opens connections to a live channel endpoint.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn connect(&self, url: &str)
        -> CoreResult<(Box<dyn FrameSink>, Box<dyn FrameStream>)>;
}

/// WebSocket transport over tokio-tungstenite.
#[derive(Debug, Default)]
pub struct WsTransport;

impl WsTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Transport for WsTransport {
    async fn connect(
        &self,
        url: &str,
    ) -> CoreResult<(Box<dyn FrameSink>, Box<dyn FrameStream>)> {
        let (stream, _response) = tokio_tungstenite::connect_async(url)
            .await
            .map_err(|error| CoreError::Transport(error.to_string()))?;
        let (sink, stream) = stream.split();
        Ok((Box::new(WsSink { inner: sink }), Box::new(WsStream { inner: stream })))
    }
}

type WsInner =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

struct WsSink {
    inner: futures_util::stream::SplitSink<WsInner, Message>,
}

#[async_trait]
impl FrameSink for WsSink {
    async fn send_text(&mut self, text: String) -> CoreResult<()> {
        self.inner
            .send(Message::Text(text))
            .await
            .map_err(|error| CoreError::Transport(error.to_string()))
    }

    async fn close(&mut self) {
        let _ = self.inner.send(Message::Close(None)).await;
    }
}

struct WsStream {
    inner: futures_util::stream::SplitStream<WsInner>,
}

#[async_trait]
impl FrameStream for WsStream {
    async fn next_text(&mut self) -> Option<CoreResult<String>> {
        loop {
            match self.inner.next().await? {
                Ok(Message::Text(text)) => return Some(Ok(text)),
                Ok(Message::Close(_)) => return None,
                // Pings are answered by tungstenite on the write path;
                // binary and pong frames carry nothing for us.
                Ok(_) => continue,
                Err(error) => return Some(Err(CoreError::Transport(error.to_string()))),
            }
        }
    }
}
