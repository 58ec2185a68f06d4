//! # Queue overflow strategy
//!
//! The event queue holds at most `capacity` events. When a new event arrives and
//! the queue is full, the strategy decides what happens.
//!
//! ## Variants
//! - `Bounded`: **suspend** the producer until space frees up (backpressure).
//! - `Dropping`: **refuse** the new event; the queue is left untouched.
//! - `Sliding`: **evict** the oldest queued event and admit the new one.
//!
//! ## Invariants
//! - The strategy is fixed at queue construction and never changes.
//! - `Dropping` never reorders; `Sliding` only breaks order for the evicted element.

/// Admission policy applied when the queue is full.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum QueueStrategy {
    /// Wait for space.
    ///
    /// Use when:
    /// - Every event matters more than producer latency
    /// - Producers can tolerate being slowed down
    Bounded,

    /// Discard the newest event.
    ///
    /// Use when:
    /// - Producers must never block
    /// - Older events are as valuable as newer ones
    #[default]
    Dropping,

    /// Discard the oldest event.
    ///
    /// Use when:
    /// - Producers must never block
    /// - Recent events are more valuable (e.g. latest state snapshots)
    Sliding,
}

impl QueueStrategy {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            QueueStrategy::Bounded => "bounded",
            QueueStrategy::Dropping => "dropping",
            QueueStrategy::Sliding => "sliding",
        }
    }
}
