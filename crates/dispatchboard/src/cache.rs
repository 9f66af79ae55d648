//! Query cache shared between the live channel and data-fetching views.

use std::fmt;

use moka::sync::Cache;
use serde::{Deserialize, Serialize};

/// The fixed vocabulary of cache keys the dashboard fetch layer uses.
///
/// The invalidation router maps live message tags onto these keys; the
/// data-fetch layer must recognize exactly this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKey {
    Loads,
    Drivers,
    Metrics,
    Negotiations,
    Alerts,
    IotDevices,
    SecurityEvents,
    SecurityReport,
    Weather,
}

impl QueryKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKey::Loads => "loads",
            QueryKey::Drivers => "drivers",
            QueryKey::Metrics => "metrics",
            QueryKey::Negotiations => "negotiations",
            QueryKey::Alerts => "alerts",
            QueryKey::IotDevices => "iot_devices",
            QueryKey::SecurityEvents => "security_events",
            QueryKey::SecurityReport => "security_report",
            QueryKey::Weather => "weather",
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// In-memory cache of fetched query results keyed by [`QueryKey`].
///
/// `invalidate` is an idempotent mark-stale: a missing entry is not an
/// error, and repeated invalidations are safe from any callback. Clones
/// share the underlying cache.
#[derive(Debug, Clone)]
pub struct QueryCache {
    cache: Cache<QueryKey, serde_json::Value>,
}

impl QueryCache {
    pub fn new() -> Self {
        // Nine fixed keys; capacity is generous so entries only leave by
        // invalidation.
        let cache = Cache::builder().max_capacity(64).build();
        Self { cache }
    }

    pub fn insert(&self, key: QueryKey, value: serde_json::Value) {
        self.cache.insert(key, value);
    }

    pub fn get(&self, key: &QueryKey) -> Option<serde_json::Value> {
        self.cache.get(key)
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.cache.contains_key(key)
    }

    pub fn invalidate(&self, key: &QueryKey) {
        self.cache.invalidate(key);
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}
