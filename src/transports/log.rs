//! # LogTransport: batch writer over `tracing`
//!
//! A minimal destination that records each event of a batch as a `tracing`
//! `info` record. Use it for tests, demos, or as a local debugging sink.
//!
//! ## Example output (fmt subscriber)
//! ```text
//! INFO batchvisor::transports::log: [batch] transport="log" size=2
//! INFO batchvisor::transports::log: [event] id="5f0c..." name="signup" payload={"plan":"pro"}
//! INFO batchvisor::transports::log: [event] id="a91e..." name="login" payload=null
//! ```

use async_trait::async_trait;

use crate::error::TransportError;
use crate::events::Event;
use crate::transports::Transport;

/// Destination that logs batches instead of sending them anywhere.
#[derive(Debug, Default)]
pub struct LogTransport;

impl LogTransport {
    /// Construct a new [`LogTransport`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Transport for LogTransport {
    fn name(&self) -> &str {
        "log"
    }

    async fn send(&self, batch: &[Event]) -> Result<(), TransportError> {
        tracing::info!(transport = self.name(), size = batch.len(), "[batch]");
        for ev in batch {
            tracing::info!(
                id = ev.id(),
                name = ev.name(),
                payload = %ev.payload(),
                "[event]"
            );
        }
        Ok(())
    }
}
