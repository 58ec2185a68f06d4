//! Error types used by the batchvisor pipeline.
//!
//! This module defines three error types:
//!
//! - [`TransportError`]: a single destination failed to accept a batch.
//! - [`DispatchError`]: the dispatcher could not deliver a batch anywhere.
//! - [`TrackerError`]: errors surfaced by the public [`Tracker`](crate::Tracker) surface.
//!
//! All of them provide helper methods (`as_label`, `as_message`) for logging,
//! and [`TransportError::is_retryable`] drives the dispatcher's retry decision.

use std::borrow::Cow;

use thiserror::Error;

/// # Failure reported by a destination.
///
/// Returned by [`Transport::send`](crate::Transport::send). The `retryable` flag is
/// the only input to the retry decision: retryable failures are retried with
/// backoff, non-retryable failures stop that destination immediately.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("transport '{transport}' failed: {reason}")]
pub struct TransportError {
    /// Name of the offending destination.
    pub transport: Cow<'static, str>,
    /// Human-readable cause.
    pub reason: String,
    /// Whether the dispatcher should retry this specific failure.
    pub retryable: bool,
}

impl TransportError {
    /// Creates a transient failure that the dispatcher will retry.
    ///
    /// # Example
    /// ```
    /// use batchvisor::TransportError;
    ///
    /// let err = TransportError::retryable("http", "503 service unavailable");
    /// assert!(err.is_retryable());
    /// assert_eq!(err.as_label(), "transport_retryable");
    /// ```
    pub fn retryable(transport: impl Into<Cow<'static, str>>, reason: impl Into<String>) -> Self {
        Self {
            transport: transport.into(),
            reason: reason.into(),
            retryable: true,
        }
    }

    /// Creates a permanent failure that the dispatcher will not retry.
    pub fn fatal(transport: impl Into<Cow<'static, str>>, reason: impl Into<String>) -> Self {
        Self {
            transport: transport.into(),
            reason: reason.into(),
            retryable: false,
        }
    }

    /// Indicates whether the failure is safe to retry.
    pub fn is_retryable(&self) -> bool {
        self.retryable
    }

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        if self.retryable {
            "transport_retryable"
        } else {
            "transport_fatal"
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        format!("{}: {}", self.transport, self.reason)
    }
}

/// # Aggregate failure of one dispatch.
///
/// Produced only when **every** destination ultimately failed. Partial failures
/// are reported through the error callback and never become a `DispatchError`.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum DispatchError {
    /// No destination accepted the batch.
    #[error("all {} transports failed", .failures.len())]
    AllFailed {
        /// Final failure of each destination, in registration order.
        failures: Vec<TransportError>,
    },
}

impl DispatchError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            DispatchError::AllFailed { .. } => "dispatch_all_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            DispatchError::AllFailed { failures } => {
                let parts: Vec<String> = failures.iter().map(TransportError::as_message).collect();
                format!("all transports failed: [{}]", parts.join("; "))
            }
        }
    }
}

/// # Errors produced by the tracker surface.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum TrackerError {
    /// The tracker is shutting down or already shut down; no more events are accepted.
    #[error("tracker is closed")]
    Closed,

    /// A flush could not deliver its batch to any destination.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl TrackerError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use batchvisor::TrackerError;
    ///
    /// assert_eq!(TrackerError::Closed.as_label(), "tracker_closed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TrackerError::Closed => "tracker_closed",
            TrackerError::Dispatch(e) => e.as_label(),
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TrackerError::Closed => "tracker is closed".to_string(),
            TrackerError::Dispatch(e) => e.as_message(),
        }
    }
}
