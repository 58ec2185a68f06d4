//! # Dispatcher: concurrent fan-out with per-destination retry.
//!
//! [`Dispatcher::dispatch`] hands one batch to every registered [`Transport`]
//! concurrently. Each destination runs its own retry loop; one destination's
//! failure or pending backoff never cancels or delays another's attempt.
//!
//! ## Flow
//! ```text
//! dispatch(batch)
//!   ├─ batch empty ──────────────────────────────────► Ok(empty report)
//!   │
//!   ├─► deliver(T1, batch) ─┐
//!   ├─► deliver(T2, batch) ─┼─► join_all (every branch settles)
//!   └─► deliver(TN, batch) ─┘          │
//!                                      ▼
//!                     for each failed destination:
//!                       ├─► on_error(&err, batch)
//!                       └─► warn!(transport, reason)
//!                                      │
//!                     all failed ──► Err(DispatchError::AllFailed)
//!                     otherwise  ──► Ok(DispatchReport)
//!
//! deliver(T, batch):
//!   loop {
//!     ├─► T.send(batch)            (panics become non-retryable failures)
//!     ├─ Ok                        ─► delivered
//!     ├─ Err(retryable) && retries left
//!     │                            ─► sleep(backoff.next(retry)), retry += 1
//!     └─ Err(otherwise)            ─► failed
//!   }
//! ```
//!
//! ## Rules
//! - A retryable failure is attempted at most `1 + retry_attempts` times in total.
//! - A non-retryable failure is attempted exactly once.
//! - Every exhausted failure reaches the error callback exactly once per dispatch.
//! - All destinations receive the same batch in the same order.

use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::join_all;
use tokio::time;

use crate::dispatch::report::{DispatchReport, TransportOutcome};
use crate::error::{DispatchError, TransportError};
use crate::events::Event;
use crate::policies::BackoffPolicy;
use crate::transports::{Transport, TransportRef};

/// Callback invoked for every destination that finally failed a batch.
pub type ErrorCallback = Arc<dyn Fn(&TransportError, &[Event]) + Send + Sync + 'static>;

/// Fans batches out to a fixed set of destinations.
pub struct Dispatcher {
    transports: Vec<TransportRef>,
    backoff: BackoffPolicy,
    retry_attempts: u32,
    on_error: ErrorCallback,
}

impl Dispatcher {
    /// Creates a dispatcher over `transports`.
    ///
    /// `retry_attempts` is the number of retries after the first attempt.
    pub fn new(
        transports: Vec<TransportRef>,
        backoff: BackoffPolicy,
        retry_attempts: u32,
        on_error: ErrorCallback,
    ) -> Self {
        Self {
            transports,
            backoff,
            retry_attempts,
            on_error,
        }
    }

    /// Registered destinations, in registration order.
    pub fn transports(&self) -> &[TransportRef] {
        &self.transports
    }

    /// Delivers `batch` to every destination and waits for all of them to settle.
    ///
    /// Fails only if every destination failed. An empty batch, or a dispatcher
    /// without destinations, succeeds without contacting anything.
    pub async fn dispatch(&self, batch: &[Event]) -> Result<DispatchReport, DispatchError> {
        let mut report = DispatchReport {
            batch_size: batch.len(),
            outcomes: Vec::new(),
        };
        if batch.is_empty() {
            return Ok(report);
        }

        let deliveries = self
            .transports
            .iter()
            .map(|t| self.deliver(t.as_ref(), batch));
        report.outcomes = join_all(deliveries).await;

        for err in report.failures() {
            tracing::warn!(
                transport = %err.transport,
                reason = %err.reason,
                retryable = err.retryable,
                batch_size = batch.len(),
                "batch delivery failed"
            );
            self.report_error(err, batch);
        }

        if !report.outcomes.is_empty() && report.delivered().next().is_none() {
            let failures: Vec<TransportError> = report.failures().cloned().collect();
            tracing::warn!(
                transports = failures.len(),
                batch_size = batch.len(),
                "batch not delivered to any transport"
            );
            return Err(DispatchError::AllFailed { failures });
        }
        Ok(report)
    }

    /// Runs the retry loop of one destination.
    async fn deliver(&self, transport: &dyn Transport, batch: &[Event]) -> TransportOutcome {
        let name = transport.name().to_string();
        let mut retry: u32 = 0;

        loop {
            let res = AssertUnwindSafe(transport.send(batch))
                .catch_unwind()
                .await
                .unwrap_or_else(|panic| {
                    Err(TransportError::fatal(
                        name.clone(),
                        format!("transport panicked: {}", panic_message(&*panic)),
                    ))
                });

            match res {
                Ok(()) => {
                    return TransportOutcome {
                        transport: name,
                        attempts: retry + 1,
                        result: Ok(()),
                    };
                }
                Err(e) if e.is_retryable() && retry < self.retry_attempts => {
                    let delay = self.backoff.next(retry);
                    tracing::debug!(
                        transport = %name,
                        attempt = retry + 1,
                        delay_ms = delay.as_millis() as u64,
                        reason = %e.reason,
                        "retry scheduled"
                    );
                    time::sleep(delay).await;
                    retry += 1;
                }
                Err(e) => {
                    return TransportOutcome {
                        transport: name,
                        attempts: retry + 1,
                        result: Err(e),
                    };
                }
            }
        }
    }

    /// Invokes the error callback; a panicking callback is logged and ignored.
    fn report_error(&self, err: &TransportError, batch: &[Event]) {
        let cb = AssertUnwindSafe(|| (self.on_error)(err, batch));
        if let Err(panic) = std::panic::catch_unwind(cb) {
            tracing::warn!(
                transport = %err.transport,
                panic = %panic_message(&*panic),
                "error callback panicked"
            );
        }
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.transports.iter().map(|t| t.name()).collect();
        f.debug_struct("Dispatcher")
            .field("transports", &names)
            .field("backoff", &self.backoff)
            .field("retry_attempts", &self.retry_attempts)
            .finish_non_exhaustive()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}
