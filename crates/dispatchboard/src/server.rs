//! The dispatch server hosting the live channel endpoint.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, oneshot};
use tower_http::cors::{Any, CorsLayer};

use crate::error::{CoreError, CoreResult};

pub mod live;

pub(crate) struct ServerState {
    pub(crate) updates: broadcast::Sender<String>,
}

/// axum server exposing `/health` and the `/ws` live channel endpoint.
///
/// Frames published through [`LiveServer::publish`] fan out to every
/// connected client. Shutdown is graceful via a oneshot, and dropping the
/// server shuts it down.
pub struct LiveServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    updates: broadcast::Sender<String>,
}

impl LiveServer {
    pub async fn bind(addr: &str) -> CoreResult<Self> {
        let (updates, _) = broadcast::channel::<String>(128);
        let state = Arc::new(ServerState {
            updates: updates.clone(),
        });
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        let app = Router::new()
            .route("/health", get(health))
            .route("/ws", get(live::ws_handler))
            .with_state(state)
            .layer(cors);

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|error| CoreError::Internal(format!("failed to bind {addr}: {error}")))?;
        let addr = listener
            .local_addr()
            .map_err(|error| CoreError::Internal(error.to_string()))?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            let _ = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await;
        });

        Ok(LiveServer {
            addr,
            shutdown: Some(shutdown_tx),
            updates,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// ws:// URL of the live endpoint.
    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    /// Serialize and broadcast a frame to all connected clients. Returns
    /// the number of clients it reached.
    pub fn publish(&self, frame: &serde_json::Value) -> CoreResult<usize> {
        let text = serde_json::to_string(frame)
            .map_err(|error| CoreError::Internal(format!("failed to serialize frame: {error}")))?;
        Ok(self.updates.send(text).unwrap_or(0))
    }

    pub fn shutdown(&mut self) -> CoreResult<()> {
        if let Some(sender) = self.shutdown.take() {
            sender
                .send(())
                .map_err(|_| CoreError::Internal("failed to send shutdown signal".to_string()))
        } else {
            Ok(())
        }
    }
}

impl Drop for LiveServer {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}

async fn health() -> &'static str {
    "ok"
}
