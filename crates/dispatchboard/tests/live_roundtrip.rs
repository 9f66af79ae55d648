//! End-to-end: real server, real WebSocket transport, cache invalidation
//! observed on the client.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::time::{sleep, timeout};

use dispatchboard::{
    Bus, ConnectionState, LiveChannelClient, LiveConfig, LiveServer, MessageTag, QueryCache,
    QueryKey, WsTransport,
};

fn client_for(server: &LiveServer) -> LiveChannelClient {
    let config = LiveConfig {
        endpoint: server.ws_url(),
        reconnect_interval_ms: 50,
        max_reconnect_attempts: 3,
    };
    LiveChannelClient::new(config, Arc::new(WsTransport::new()), QueryCache::new(), Bus::new(32))
}

async fn wait_for_state(client: &LiveChannelClient, want: ConnectionState) {
    let mut rx = client.watch_state();
    timeout(Duration::from_secs(2), async {
        loop {
            if *rx.borrow() == want {
                return;
            }
            rx.changed().await.expect("state channel closed");
        }
    })
    .await
    .unwrap_or_else(|_| panic!("timed out waiting for state {want}"));
}

#[tokio::test]
async fn frame_from_server_invalidates_client_cache() {
    let server = LiveServer::bind("127.0.0.1:0").await.expect("bind");
    let client = client_for(&server);

    client.cache().insert(QueryKey::Loads, json!([{"id": "L-9"}]));
    client.cache().insert(QueryKey::Metrics, json!({"active": 1}));
    let mut messages = client.subscribe();

    client.connect().await;
    wait_for_state(&client, ConnectionState::Connected).await;

    // The subscription inside the server's ws task races the publish;
    // retry until the frame lands.
    let received = timeout(Duration::from_secs(2), async {
        loop {
            let _ = server.publish(&json!({
                "type": "load_update",
                "payload": {"load_id": "L-9", "status": "in_transit"}
            }));
            match timeout(Duration::from_millis(100), messages.recv()).await {
                Ok(Ok(message)) => return message,
                _ => sleep(Duration::from_millis(20)).await,
            }
        }
    })
    .await
    .expect("no live message received");

    assert_eq!(received.tag, MessageTag::LoadUpdate);
    assert!(!client.cache().contains(&QueryKey::Loads));
    assert!(!client.cache().contains(&QueryKey::Metrics));

    client.disconnect().await;
}

#[tokio::test]
async fn send_works_only_while_connected() {
    let server = LiveServer::bind("127.0.0.1:0").await.expect("bind");
    let client = client_for(&server);

    let frame = json!({"type": "subscribe", "payload": {"channel": "loads"}});
    assert!(!client.send(&frame).await);

    client.connect().await;
    wait_for_state(&client, ConnectionState::Connected).await;
    assert!(client.send(&frame).await);

    client.disconnect().await;
    assert!(!client.send(&frame).await);
}

#[tokio::test]
async fn refused_endpoint_leads_to_bounded_retries() {
    // Bind and immediately release a port so connections are refused.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let config = LiveConfig {
        endpoint: format!("ws://{addr}/ws"),
        reconnect_interval_ms: 20,
        max_reconnect_attempts: 2,
    };
    let client =
        LiveChannelClient::new(config, Arc::new(WsTransport::new()), QueryCache::new(), Bus::new(8));

    client.connect().await;

    // Retries are bounded; the client parks in Error until told otherwise.
    wait_for_state(&client, ConnectionState::Error).await;
    assert!(!client.send(&json!({"type": "ping"})).await);

    client.disconnect().await;
    assert_eq!(client.state(), ConnectionState::Disconnected);
}
