//! # Exponential backoff for delivery retries.
//!
//! [`BackoffPolicy`] computes how long a destination waits before retrying a
//! batch. The delay before retry `n` (0-indexed) is `first × factor^n`, capped at
//! `max`, then randomized by [`JitterPolicy`]. The base is derived purely from the
//! retry index, so jitter output never feeds back into later delays.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use batchvisor::{BackoffPolicy, JitterPolicy};
//!
//! let backoff = BackoffPolicy {
//!     first: Duration::from_secs(1),
//!     max: Duration::from_secs(30),
//!     factor: 2.0,
//!     jitter: JitterPolicy::None,
//! };
//!
//! assert_eq!(backoff.next(0), Duration::from_secs(1));
//! assert_eq!(backoff.next(1), Duration::from_secs(2));
//! assert_eq!(backoff.next(2), Duration::from_secs(4));
//! assert_eq!(backoff.next(9), Duration::from_secs(30));
//! ```

use std::time::Duration;

use crate::policies::jitter::JitterPolicy;

/// Retry delay schedule.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackoffPolicy {
    /// Delay before the first retry.
    pub first: Duration,
    /// Upper bound for any single delay.
    pub max: Duration,
    /// Multiplicative growth per retry (`2.0` doubles).
    pub factor: f64,
    /// Randomization applied to every delay.
    pub jitter: JitterPolicy,
}

impl Default for BackoffPolicy {
    /// `first = 1s`, `factor = 2.0`, `max = 30s`, `jitter = Equal`.
    fn default() -> Self {
        Self {
            first: Duration::from_secs(1),
            max: Duration::from_secs(30),
            factor: 2.0,
            jitter: JitterPolicy::Equal,
        }
    }
}

impl BackoffPolicy {
    /// Delay before retry number `retry` (0-indexed).
    ///
    /// Non-finite or negative intermediate values clamp to [`BackoffPolicy::max`].
    pub fn next(&self, retry: u32) -> Duration {
        let exp = retry.min(i32::MAX as u32) as i32;
        let secs = self.first.as_secs_f64() * self.factor.powi(exp);

        let base = if !secs.is_finite() || secs < 0.0 || secs > self.max.as_secs_f64() {
            self.max
        } else {
            Duration::from_secs_f64(secs)
        };
        self.jitter.apply(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doubling(first_ms: u64, max_ms: u64) -> BackoffPolicy {
        BackoffPolicy {
            first: Duration::from_millis(first_ms),
            max: Duration::from_millis(max_ms),
            factor: 2.0,
            jitter: JitterPolicy::None,
        }
    }

    #[test]
    fn test_delay_doubles_each_retry() {
        let policy = doubling(50, 60_000);
        let delays: Vec<u64> = (0..5).map(|n| policy.next(n).as_millis() as u64).collect();
        assert_eq!(delays, vec![50, 100, 200, 400, 800]);
    }

    #[test]
    fn test_delay_is_capped() {
        let policy = doubling(100, 1_000);
        assert_eq!(policy.next(4), Duration::from_millis(1_000));
        assert_eq!(policy.next(200), Duration::from_millis(1_000));
    }

    #[test]
    fn test_overflow_clamps_to_max() {
        let policy = doubling(100, 5_000);
        assert_eq!(policy.next(u32::MAX), Duration::from_millis(5_000));
    }

    #[test]
    fn test_first_above_max_is_capped() {
        let policy = doubling(10_000, 2_000);
        assert_eq!(policy.next(0), Duration::from_millis(2_000));
    }

    #[test]
    fn test_equal_jitter_stays_in_band() {
        let policy = BackoffPolicy {
            jitter: JitterPolicy::Equal,
            ..doubling(400, 60_000)
        };
        for retry in 0..6 {
            let base = Duration::from_millis(400 << retry);
            let delay = policy.next(retry);
            assert!(delay >= base / 2, "retry {retry}: {delay:?} < {:?}", base / 2);
            assert!(delay <= base, "retry {retry}: {delay:?} > {base:?}");
        }
    }
}
