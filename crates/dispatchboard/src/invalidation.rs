//! Maps live message tags to query cache invalidations.

use tracing::debug;

use crate::cache::{QueryCache, QueryKey};
use crate::live::message::{LiveMessage, MessageTag};

/// Routes inbound live messages to cache invalidations.
///
/// The mapping is total over the tag space: every known tag invalidates a
/// fixed, ordered set of keys, and unknown tags invalidate nothing. The
/// performed invalidations are returned for observability.
#[derive(Debug, Default)]
pub struct InvalidationRouter;

impl InvalidationRouter {
    pub fn new() -> Self {
        Self
    }

    /// The fixed set of keys a tag invalidates, in invalidation order.
    pub fn keys_for(tag: &MessageTag) -> Vec<QueryKey> {
        match tag {
            // Metrics aggregate over loads, so a load change stales both.
            MessageTag::LoadUpdate => vec![QueryKey::Loads, QueryKey::Metrics],
            MessageTag::DriverUpdate => vec![QueryKey::Drivers],
            MessageTag::NegotiationUpdate => vec![QueryKey::Negotiations],
            // Alerts are raised by IoT devices; both views go stale together.
            MessageTag::Alert => vec![QueryKey::Alerts, QueryKey::IotDevices],
            MessageTag::SecurityEvent => {
                vec![QueryKey::SecurityEvents, QueryKey::SecurityReport]
            }
            MessageTag::WeatherUpdate => vec![QueryKey::Weather],
            MessageTag::Unknown(_) => Vec::new(),
        }
    }

    /// Invalidate the cache keys mapped to `message`'s tag.
    ///
    /// Returns the keys invalidated, in order. Unknown tags log a
    /// diagnostic and return an empty sequence; this is never an error.
    pub fn route(&self, message: &LiveMessage, cache: &QueryCache) -> Vec<QueryKey> {
        let keys = Self::keys_for(&message.tag);
        if keys.is_empty() {
            debug!(tag = %message.tag, "no invalidation mapping for live message tag");
            return keys;
        }
        for key in &keys {
            cache.invalidate(key);
        }
        debug!(tag = %message.tag, count = keys.len(), "invalidated query keys");
        keys
    }
}
