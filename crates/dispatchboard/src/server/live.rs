//! WebSocket fan-out endpoint for the live channel.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::server::ServerState;

pub(crate) async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Forward every published update to the client; inbound frames are
/// logged only (the fan-out is unconditional, there is no subscription
/// protocol).
async fn handle_socket(socket: WebSocket, state: Arc<ServerState>) {
    let client_id = Uuid::new_v4();
    info!(%client_id, "live client connected");

    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut updates = state.updates.subscribe();

    loop {
        tokio::select! {
            update = updates.recv() => match update {
                Ok(frame) => {
                    if ws_tx.send(Message::Text(frame)).await.is_err() {
                        debug!(%client_id, "send failed, client gone");
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(%client_id, skipped, "live client lagging, frames dropped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            inbound = ws_rx.next() => match inbound {
                Some(Ok(Message::Text(text))) => {
                    debug!(%client_id, frame = %text, "inbound live frame");
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(error)) => {
                    warn!(%client_id, %error, "live socket error");
                    break;
                }
            },
        }
    }

    info!(%client_id, "live client disconnected");
}
