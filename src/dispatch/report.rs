//! Per-destination results of one dispatch.

use crate::error::TransportError;

/// Final result of delivering one batch to one destination.
#[derive(Debug, Clone)]
pub struct TransportOutcome {
    /// Destination name.
    pub transport: String,
    /// Number of `send` calls made (1-based; includes the first attempt).
    pub attempts: u32,
    /// `Ok` if one attempt succeeded, otherwise the last failure.
    pub result: Result<(), TransportError>,
}

impl TransportOutcome {
    /// True if the batch reached this destination.
    pub fn is_delivered(&self) -> bool {
        self.result.is_ok()
    }
}

/// Outcome of a dispatch that reached at least one destination
/// (or had nothing to deliver).
#[derive(Debug, Clone, Default)]
pub struct DispatchReport {
    /// Number of events in the batch.
    pub batch_size: usize,
    /// One entry per destination, in registration order.
    pub outcomes: Vec<TransportOutcome>,
}

impl DispatchReport {
    /// Names of destinations that accepted the batch.
    pub fn delivered(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter(|o| o.is_delivered())
            .map(|o| o.transport.as_str())
    }

    /// Final failures of destinations that did not accept the batch.
    pub fn failures(&self) -> impl Iterator<Item = &TransportError> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().err())
    }

    /// True if some, but not all, destinations failed.
    pub fn is_partial(&self) -> bool {
        let failed = self.failures().count();
        failed > 0 && failed < self.outcomes.len()
    }
}
