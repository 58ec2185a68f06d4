//! # Tracker configuration.
//!
//! Provides [`TrackerConfig`], the settings a [`Tracker`](crate::Tracker) is built
//! from. Fields are public; start from [`TrackerConfig::default`] and override
//! what you need. Once the tracker is built its configuration is immutable.
//!
//! Callbacks are not part of this struct: the error callback and the id
//! generator are set on the [`TrackerBuilder`](crate::TrackerBuilder).
//!
//! ## Sentinel values
//! - `batch_size = 0`, `queue_capacity = 0` → clamped to 1
//! - `flush_interval = 0s` → clamped to 1ms (the batching loop never spins)

use std::time::Duration;

use crate::events::Metadata;
use crate::policies::{BackoffPolicy, JitterPolicy};
use crate::queue::QueueStrategy;

/// Settings for one tracker instance.
///
/// ## Field semantics
/// - `batch_size`: events per batch; a full batch is dispatched immediately
/// - `flush_interval`: partial batches are dispatched after this long
/// - `queue_capacity` / `queue_strategy`: pending-event bound and overflow policy
/// - `retry_*`: per-destination retry schedule (`retry_attempts` retries after the first try)
/// - `shutdown_timeout`: bound on the final drain during [`Tracker::shutdown`](crate::Tracker::shutdown)
/// - `static_metadata`: keys attached to every event (per-call metadata wins on collision)
#[derive(Clone, Debug)]
pub struct TrackerConfig {
    /// Maximum number of events per batch.
    pub batch_size: usize,

    /// Maximum time a partial batch waits before it is dispatched.
    pub flush_interval: Duration,

    /// Maximum number of events waiting in the queue.
    pub queue_capacity: usize,

    /// What happens when the queue is full.
    pub queue_strategy: QueueStrategy,

    /// Retries per destination after the first attempt (retryable failures only).
    pub retry_attempts: u32,

    /// Delay before the first retry; doubles on every following retry.
    pub retry_base_delay: Duration,

    /// Upper bound for a single retry delay.
    pub retry_max_delay: Duration,

    /// Randomization applied to each retry delay.
    pub retry_jitter: JitterPolicy,

    /// Maximum time spent draining on shutdown before remaining events are abandoned.
    pub shutdown_timeout: Duration,

    /// Metadata attached to every tracked event.
    pub static_metadata: Metadata,
}

impl TrackerConfig {
    /// Returns the batch size clamped to a minimum of 1.
    #[inline]
    pub fn batch_size_clamped(&self) -> usize {
        self.batch_size.max(1)
    }

    /// Returns the queue capacity clamped to a minimum of 1.
    #[inline]
    pub fn queue_capacity_clamped(&self) -> usize {
        self.queue_capacity.max(1)
    }

    /// Returns the flush interval clamped to a minimum of 1ms.
    #[inline]
    pub fn flush_interval_clamped(&self) -> Duration {
        self.flush_interval.max(Duration::from_millis(1))
    }

    /// Builds the doubling retry schedule described by the `retry_*` fields.
    pub fn backoff(&self) -> BackoffPolicy {
        BackoffPolicy {
            first: self.retry_base_delay,
            max: self.retry_max_delay.max(self.retry_base_delay),
            factor: 2.0,
            jitter: self.retry_jitter,
        }
    }

    /// Returns a copy with every sentinel resolved to its effective value.
    pub(crate) fn resolved(mut self) -> Self {
        self.batch_size = self.batch_size_clamped();
        self.queue_capacity = self.queue_capacity_clamped();
        self.flush_interval = self.flush_interval_clamped();
        self
    }
}

impl Default for TrackerConfig {
    /// Default configuration:
    ///
    /// - `batch_size = 10`
    /// - `flush_interval = 5s`
    /// - `queue_capacity = 1000`, `queue_strategy = Dropping`
    /// - `retry_attempts = 3`, `retry_base_delay = 1s`, `retry_max_delay = 30s`, `retry_jitter = Equal`
    /// - `shutdown_timeout = 30s`
    /// - `static_metadata = {}`
    fn default() -> Self {
        Self {
            batch_size: 10,
            flush_interval: Duration::from_secs(5),
            queue_capacity: 1000,
            queue_strategy: QueueStrategy::default(),
            retry_attempts: 3,
            retry_base_delay: Duration::from_secs(1),
            retry_max_delay: Duration::from_secs(30),
            retry_jitter: JitterPolicy::Equal,
            shutdown_timeout: Duration::from_secs(30),
            static_metadata: Metadata::new(),
        }
    }
}
