//! Wire format of the push stream.
//!
//! Inbound messages are JSON objects tagged by a `type` field. The decoder
//! treats unknown tags as a distinct variant instead of an error so that new
//! server-side event kinds never break dispatch of subsequent events.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::meeting::Meeting;
use crate::sync::error::SyncError;

/// One event pushed by the server.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundEvent {
    /// A meeting became active. Insert into the registry.
    MeetingStarted { meeting: Meeting },
    /// A meeting finished. The id is authoritative; some backends also embed
    /// the final record, which removal does not need.
    MeetingEnded {
        meeting_id: String,
        #[serde(default)]
        meeting: Option<Meeting>,
    },
    /// Live transcript fragment for presentation; never stored.
    TranscriptUpdate {
        #[serde(default)]
        text: String,
    },
    /// Authoritative full snapshot of active meetings.
    MeetingsUpdate { meetings: Vec<Meeting> },
    /// Answer to a heartbeat probe.
    Pong {
        #[serde(default)]
        timestamp: Option<i64>,
    },
    /// Anything with a tag this client does not understand.
    #[serde(skip)]
    Unknown { raw_tag: String },
}

const KNOWN_TAGS: &[&str] = &[
    "meeting_started",
    "meeting_ended",
    "transcript_update",
    "meetings_update",
    "pong",
];

impl InboundEvent {
    /// Decode a raw text frame.
    ///
    /// Known tags with a malformed payload are decode errors; unknown tags
    /// decode to [`InboundEvent::Unknown`].
    pub fn decode(raw: &str) -> Result<Self, SyncError> {
        let value: Value = serde_json::from_str(raw)?;
        let tag = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| SyncError::Decode("message has no 'type' field".to_string()))?;

        if !KNOWN_TAGS.contains(&tag) {
            return Ok(Self::Unknown {
                raw_tag: tag.to_string(),
            });
        }

        serde_json::from_value(value).map_err(SyncError::from)
    }
}

/// Messages this client writes to the stream.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    Ping { timestamp: i64 },
}

impl OutboundMessage {
    pub fn ping_now() -> Self {
        Self::Ping {
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Serialize to a text frame. A ping is a flat two-field object, so
    /// serialization cannot fail in practice.
    pub fn to_frame(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
