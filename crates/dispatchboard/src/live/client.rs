//! The live channel client: one connection, bounded fixed-delay
//! reconnection, and synchronous dispatch of inbound frames.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::{broadcast, watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::bus::Bus;
use crate::cache::QueryCache;
use crate::config::LiveConfig;
use crate::invalidation::InvalidationRouter;
use crate::live::message::LiveMessage;
use crate::live::transport::{FrameSink, FrameStream, Transport};

/// Connection lifecycle state, owned exclusively by the client and
/// published through a watch channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Error,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Error => "error",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

struct Shared {
    sink: Option<Box<dyn FrameSink>>,
    reader: Option<JoinHandle<()>>,
    /// The single pending retry. Must be aborted on `disconnect()` or a
    /// leaked timer reconnects after explicit shutdown.
    retry: Option<JoinHandle<()>>,
    attempts: u32,
    last_message: Option<LiveMessage>,
    /// Set by `disconnect()` to suppress the automatic retry for that
    /// close.
    shutdown: bool,
}

struct ClientInner {
    config: LiveConfig,
    transport: Arc<dyn Transport>,
    router: InvalidationRouter,
    cache: QueryCache,
    bus: Bus,
    state_tx: watch::Sender<ConnectionState>,
    /// Keeps the watch channel open so `state_tx.send` stores the new
    /// state even when no external subscriber exists.
    _state_rx: watch::Receiver<ConnectionState>,
    shared: Mutex<Shared>,
}

/// Maintains at most one open connection to the live channel endpoint.
///
/// Unexpected closes schedule a `connect()` after a fixed delay until
/// `max_reconnect_attempts` consecutive failures; the counter resets only
/// on a successful open. Transport errors surface as the `Error` state
/// and never as panics or queued work.
#[derive(Clone)]
pub struct LiveChannelClient {
    inner: Arc<ClientInner>,
}

impl LiveChannelClient {
    pub fn new(
        config: LiveConfig,
        transport: Arc<dyn Transport>,
        cache: QueryCache,
        bus: Bus,
    ) -> Self {
        let (state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);
        Self {
            inner: Arc::new(ClientInner {
                config,
                transport,
                router: InvalidationRouter::new(),
                cache,
                bus,
                state_tx,
                _state_rx: state_rx,
                shared: Mutex::new(Shared {
                    sink: None,
                    reader: None,
                    retry: None,
                    attempts: 0,
                    last_message: None,
                    shutdown: false,
                }),
            }),
        }
    }

    pub fn state(&self) -> ConnectionState {
        *self.inner.state_tx.borrow()
    }

    /// Watch connection state transitions.
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.state_tx.subscribe()
    }

    /// Subscribe to the stream of received live messages.
    pub fn subscribe(&self) -> broadcast::Receiver<LiveMessage> {
        self.inner.bus.subscribe()
    }

    pub fn cache(&self) -> &QueryCache {
        &self.inner.cache
    }

    pub async fn last_message(&self) -> Option<LiveMessage> {
        self.inner.shared.lock().await.last_message.clone()
    }

    pub async fn reconnect_attempts(&self) -> u32 {
        self.inner.shared.lock().await.attempts
    }

    /// Open the connection. No-op while already connected or connecting;
    /// a manual call also cancels any pending scheduled retry so attempts
    /// stay strictly sequential.
    pub async fn connect(&self) {
        Arc::clone(&self.inner).connect(false).await;
    }

    /// Close the connection and cancel any pending retry. Idempotent.
    pub async fn disconnect(&self) {
        let mut shared = self.inner.shared.lock().await;
        shared.shutdown = true;
        if let Some(retry) = shared.retry.take() {
            retry.abort();
        }
        if let Some(reader) = shared.reader.take() {
            reader.abort();
        }
        if let Some(mut sink) = shared.sink.take() {
            sink.close().await;
        }
        let _ = self.inner.state_tx.send(ConnectionState::Disconnected);
        info!("live channel disconnected");
    }

    /// Serialize and transmit `value` if connected. Returns false without
    /// touching the transport otherwise; nothing is ever queued.
    pub async fn send(&self, value: &serde_json::Value) -> bool {
        let mut shared = self.inner.shared.lock().await;
        if *self.inner.state_tx.borrow() != ConnectionState::Connected {
            return false;
        }
        let Some(sink) = shared.sink.as_mut() else {
            return false;
        };
        let text = match serde_json::to_string(value) {
            Ok(text) => text,
            Err(error) => {
                warn!(%error, "failed to serialize outbound live frame");
                return false;
            }
        };
        match sink.send_text(text).await {
            Ok(()) => true,
            Err(error) => {
                warn!(%error, "failed to send live frame");
                false
            }
        }
    }
}

impl ClientInner {
    // Boxed because this future is recursive: `schedule_reconnect` spawns
    // another `connect`, so the compiler cannot size or `Send`-check the
    // plain `async fn` form.
    fn connect(
        self: Arc<Self>,
        from_retry: bool,
    ) -> Pin<Box<dyn Future<Output = ()> + Send>> {
        Box::pin(self.connect_impl(from_retry))
    }

    async fn connect_impl(self: Arc<Self>, from_retry: bool) {
        {
            let mut shared = self.shared.lock().await;
            match *self.state_tx.borrow() {
                ConnectionState::Connected | ConnectionState::Connecting => return,
                _ => {}
            }
            shared.shutdown = false;
            if from_retry {
                // We are the retry task; just vacate the slot.
                shared.retry = None;
            } else if let Some(retry) = shared.retry.take() {
                retry.abort();
            }
            let _ = self.state_tx.send(ConnectionState::Connecting);
        }

        match self.transport.connect(&self.config.endpoint).await {
            Ok((sink, stream)) => {
                let mut shared = self.shared.lock().await;
                if shared.shutdown {
                    // disconnect() raced the open; drop the connection.
                    let mut sink = sink;
                    sink.close().await;
                    return;
                }
                shared.sink = Some(sink);
                shared.attempts = 0;
                let _ = self.state_tx.send(ConnectionState::Connected);
                info!(endpoint = %self.config.endpoint, "live channel connected");
                let this = Arc::clone(&self);
                shared.reader = Some(tokio::spawn(async move {
                    this.read_loop(stream).await;
                }));
            }
            Err(error) => {
                warn!(%error, endpoint = %self.config.endpoint, "live channel connect failed");
                let _ = self.state_tx.send(ConnectionState::Disconnected);
                self.schedule_reconnect().await;
            }
        }
    }

    async fn read_loop(self: Arc<Self>, mut stream: Box<dyn FrameStream>) {
        loop {
            match stream.next_text().await {
                Some(Ok(text)) => self.handle_frame(&text).await,
                Some(Err(error)) => {
                    // Errors flag the connection but only a close
                    // schedules a retry.
                    warn!(%error, "live channel transport error");
                    let _ = self.state_tx.send(ConnectionState::Error);
                }
                None => break,
            }
        }

        let _ = self.state_tx.send(ConnectionState::Disconnected);
        let shutdown = {
            let mut shared = self.shared.lock().await;
            shared.sink = None;
            shared.reader = None;
            shared.shutdown
        };
        if shutdown {
            return;
        }
        info!("live channel closed by peer");
        self.schedule_reconnect().await;
    }

    async fn handle_frame(&self, text: &str) {
        let message = match LiveMessage::parse(text) {
            Ok(message) => message,
            Err(error) => {
                warn!(%error, "dropping malformed live frame");
                return;
            }
        };
        debug!(tag = %message.tag, "live message received");
        self.router.route(&message, &self.cache);
        self.shared.lock().await.last_message = Some(message.clone());
        let _ = self.bus.publish(message);
    }

    async fn schedule_reconnect(self: Arc<Self>) {
        let mut shared = self.shared.lock().await;
        if shared.shutdown {
            return;
        }
        if shared.attempts >= self.config.max_reconnect_attempts {
            warn!(
                attempts = shared.attempts,
                "live channel gave up reconnecting; manual connect required"
            );
            let _ = self.state_tx.send(ConnectionState::Error);
            return;
        }
        shared.attempts += 1;
        let delay = self.config.reconnect_interval();
        info!(
            attempt = shared.attempts,
            max = self.config.max_reconnect_attempts,
            delay_ms = delay.as_millis() as u64,
            "scheduling live channel reconnect"
        );
        let this = Arc::clone(&self);
        shared.retry = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            this.connect(true).await;
        }));
    }
}
