//! Live channel configuration with JSON load-or-create persistence.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

pub const CONFIG_FILENAME: &str = "dispatchboard.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveConfig {
    /// WebSocket endpoint of the live channel.
    pub endpoint: String,
    /// Fixed delay between reconnection attempts. Deliberately not a
    /// backoff schedule; stretch this value for unstable networks.
    pub reconnect_interval_ms: u64,
    /// Consecutive failed attempts before the client gives up until a
    /// manual `connect()`.
    pub max_reconnect_attempts: u32,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            endpoint: "ws://127.0.0.1:8080/ws".to_string(),
            reconnect_interval_ms: 3000,
            max_reconnect_attempts: 5,
        }
    }
}

impl LiveConfig {
    pub fn reconnect_interval(&self) -> Duration {
        Duration::from_millis(self.reconnect_interval_ms)
    }
}

pub fn config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILENAME)
}

/// Load the config from `dir`, writing defaults there first if missing.
pub fn load_or_create(dir: &Path) -> CoreResult<LiveConfig> {
    std::fs::create_dir_all(dir).map_err(|error| {
        CoreError::Internal(format!(
            "failed to create config directory {}: {error}",
            dir.display()
        ))
    })?;

    let path = config_path(dir);
    if !path.exists() {
        let config = LiveConfig::default();
        write_config(&path, &config)?;
        return Ok(config);
    }

    let data = std::fs::read_to_string(&path).map_err(|error| {
        CoreError::Internal(format!("failed to read config {}: {error}", path.display()))
    })?;
    serde_json::from_str(&data).map_err(|error| {
        CoreError::Internal(format!("failed to parse config {}: {error}", path.display()))
    })
}

fn write_config(path: &Path, config: &LiveConfig) -> CoreResult<()> {
    let data = serde_json::to_string_pretty(config).map_err(|error| {
        CoreError::Internal(format!(
            "failed to serialize config {}: {error}",
            path.display()
        ))
    })?;
    std::fs::write(path, data).map_err(|error| {
        CoreError::Internal(format!("failed to write config {}: {error}", path.display()))
    })
}
