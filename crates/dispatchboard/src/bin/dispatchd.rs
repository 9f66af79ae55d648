//! Dispatch server binary: hosts the live channel endpoint and emits
//! periodic dispatch updates to connected dashboards.
//!
//! Usage: `cargo run --bin dispatchd` (config dir override via
//! `DISPATCHD_CONFIG_DIR`, listen address via `DISPATCHD_ADDR`).

use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use serde_json::json;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use dispatchboard::{config, LiveServer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config_dir = std::env::var("DISPATCHD_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."));
    let live_config = config::load_or_create(&config_dir)?;
    info!(endpoint = %live_config.endpoint, "loaded config");

    let addr = std::env::var("DISPATCHD_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    let mut server = LiveServer::bind(&addr).await?;
    info!(addr = %server.addr(), url = %server.ws_url(), "live channel endpoint up");

    let statuses = ["posted", "assigned", "in_transit", "delivered"];
    let mut ticker = tokio::time::interval(Duration::from_secs(5));
    let mut tick: usize = 0;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let frame = json!({
                    "type": "load_update",
                    "payload": {
                        "load_id": format!("L-{:04}", 1000 + tick),
                        "status": statuses[tick % statuses.len()],
                        "updated_at": Utc::now().to_rfc3339(),
                    }
                });
                let reached = server.publish(&frame)?;
                debug!(tick, reached, "published load update");
                tick += 1;
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    info!("shutting down");
    server.shutdown()?;
    Ok(())
}
