//! # Jitter applied to retry delays.
//!
//! When a destination goes down, every tracker talking to it starts retrying at
//! the same moment. [`JitterPolicy`] spreads those retries out.
//!
//! - [`JitterPolicy::None`] exact delay
//! - [`JitterPolicy::Full`] random delay in `[0, delay]`
//! - [`JitterPolicy::Equal`] `delay/2 + random[0, delay/2]`

use std::time::Duration;

use rand::Rng;

/// Randomization applied to each computed retry delay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JitterPolicy {
    /// No jitter: use the exact backoff delay.
    ///
    /// Useful in tests and when a single client talks to a destination.
    #[default]
    None,

    /// Full jitter: random delay in `[0, delay]`.
    Full,

    /// Equal jitter: `delay/2 + random[0, delay/2]`.
    ///
    /// Keeps at least half of the computed delay.
    Equal,
}

impl JitterPolicy {
    /// Applies this jitter to `delay`.
    pub fn apply(&self, delay: Duration) -> Duration {
        let nanos = delay.as_nanos().min(u64::MAX as u128) as u64;
        if nanos == 0 {
            return delay;
        }
        match self {
            JitterPolicy::None => delay,
            JitterPolicy::Full => Duration::from_nanos(rand::rng().random_range(0..=nanos)),
            JitterPolicy::Equal => {
                let half = nanos / 2;
                let extra = rand::rng().random_range(0..=nanos - half);
                Duration::from_nanos(half + extra)
            }
        }
    }
}
