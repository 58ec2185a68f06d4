//! # Tracked event record.
//!
//! An [`Event`] is one immutable tracked occurrence: a name, an arbitrary JSON
//! payload, string-keyed metadata, a millisecond timestamp and a caller-opaque id.
//!
//! Fields are read through accessors. Every transform consumes the event and
//! returns a new value, so an event already handed to the queue or to a
//! transport can never change underneath it.
//!
//! ## Metadata merge order
//! Metadata is assembled in three layers, later layers winning on key collision:
//! ```text
//! static metadata (TrackerConfig) ─► per-call metadata (track_with) ─► middleware keys
//! ```
//!
//! ## Example
//! ```rust
//! use serde_json::json;
//! use batchvisor::Event;
//!
//! let ev = Event::new("evt-1", "signup", json!({ "plan": "pro" }))
//!     .with_metadata("region", json!("eu"))
//!     .with_name("user_signup");
//!
//! assert_eq!(ev.name(), "user_signup");
//! assert_eq!(ev.metadata().get("region"), Some(&json!("eu")));
//! ```

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Arbitrary structured event payload.
pub type Payload = serde_json::Value;

/// String-keyed event metadata (keys unique, order irrelevant).
pub type Metadata = HashMap<String, serde_json::Value>;

/// One tracked occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    id: String,
    name: String,
    timestamp: u64,
    payload: Payload,
    metadata: Metadata,
}

impl Event {
    /// Creates an event stamped with the current wall-clock time and empty metadata.
    pub fn new(id: impl Into<String>, name: impl Into<String>, payload: Payload) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            timestamp: now_millis(),
            payload,
            metadata: Metadata::new(),
        }
    }

    /// Caller-opaque identifier, unique per tracked call.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Event name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Creation time in milliseconds since the Unix epoch.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Event payload.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Event metadata.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Returns the event with an explicit timestamp.
    #[inline]
    pub fn with_timestamp(mut self, millis: u64) -> Self {
        self.timestamp = millis;
        self
    }

    /// Returns the event with a different name.
    #[inline]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Returns the event with a different payload.
    #[inline]
    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    /// Returns the event with one metadata key set (overriding any existing value).
    #[inline]
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Returns the event with `extra` merged over its metadata; `extra` wins on collision.
    pub fn merge_metadata<I, K>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = (K, serde_json::Value)>,
        K: Into<String>,
    {
        self.metadata
            .extend(extra.into_iter().map(|(k, v)| (k.into(), v)));
        self
    }
}

/// Milliseconds since the Unix epoch; `0` if the clock is before the epoch.
fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
