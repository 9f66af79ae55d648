//! Wire format of inbound live channel frames.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::{CoreError, CoreResult};

/// Tag of an inbound live frame.
///
/// The tag set is finite but open: frames with a tag outside the known
/// vocabulary parse into [`MessageTag::Unknown`] and flow through the
/// system without side effects beyond a diagnostic log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageTag {
    LoadUpdate,
    DriverUpdate,
    NegotiationUpdate,
    Alert,
    SecurityEvent,
    WeatherUpdate,
    Unknown(String),
}

impl MessageTag {
    pub fn from_wire(tag: &str) -> Self {
        match tag {
            "load_update" => MessageTag::LoadUpdate,
            "driver_update" => MessageTag::DriverUpdate,
            "negotiation_update" => MessageTag::NegotiationUpdate,
            "alert" => MessageTag::Alert,
            "security_event" => MessageTag::SecurityEvent,
            "weather_update" => MessageTag::WeatherUpdate,
            other => MessageTag::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            MessageTag::LoadUpdate => "load_update",
            MessageTag::DriverUpdate => "driver_update",
            MessageTag::NegotiationUpdate => "negotiation_update",
            MessageTag::Alert => "alert",
            MessageTag::SecurityEvent => "security_event",
            MessageTag::WeatherUpdate => "weather_update",
            MessageTag::Unknown(tag) => tag,
        }
    }
}

impl fmt::Display for MessageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct WireFrame {
    #[serde(rename = "type")]
    tag: String,
    #[serde(default)]
    payload: serde_json::Value,
}

/// One inbound live frame, stamped with its receipt time.
///
/// Messages are consumed synchronously by the invalidation router and
/// published on the bus; only the most recent one is retained by the
/// client.
#[derive(Debug, Clone)]
pub struct LiveMessage {
    pub tag: MessageTag,
    pub payload: serde_json::Value,
    pub received_at: DateTime<Utc>,
}

impl LiveMessage {
    /// Parse a raw text frame, stamping it with the current time.
    pub fn parse(raw: &str) -> CoreResult<Self> {
        let frame: WireFrame = serde_json::from_str(raw)
            .map_err(|error| CoreError::InvalidInput(format!("malformed live frame: {error}")))?;
        Ok(Self {
            tag: MessageTag::from_wire(&frame.tag),
            payload: frame.payload,
            received_at: Utc::now(),
        })
    }
}
