//! Retry delay policies.
//!
//! ## Contents
//! - [`BackoffPolicy`] how retry delays evolve (first / factor / max + jitter)
//! - [`JitterPolicy`]  randomization to keep retrying clients out of lockstep
//!
//! ## Quick wiring
//! ```text
//! TrackerConfig { retry_base_delay, retry_max_delay, retry_jitter, retry_attempts }
//!      └─► TrackerConfig::backoff() ─► Dispatcher
//!           - backoff.next(retry) before each retry of one destination
//! ```
//!
//! ## Defaults
//! - `BackoffPolicy::default()` → first=1s, factor=2.0 (doubling), max=30s, jitter=Equal.

mod backoff;
mod jitter;

pub use backoff::BackoffPolicy;
pub use jitter::JitterPolicy;
