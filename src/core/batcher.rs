//! # Background batching loop.
//!
//! One [`Batcher`] runs per tracker, from build until shutdown. Each iteration
//! races two triggers and dispatches whatever the winner produced:
//!
//! ```text
//! loop {
//!   select! {
//!     ├─ token.cancelled()                          ─► exit
//!     ├─ queue.take_between(batch_size, batch_size) ─► full batch
//!     └─ sleep(flush_interval); queue.take_up_to(batch_size)
//!                                                   ─► partial batch (maybe empty)
//!   }
//!   ├─ empty    ─► next iteration
//!   └─ nonempty ─► dispatcher.dispatch(batch)  (errors already reported, swallowed here)
//! }
//! ```
//!
//! ## Rules
//! - The losing trigger is dropped; neither trigger removes events unless it wins,
//!   so no event is consumed twice.
//! - Cancellation is only observed while waiting for a batch. A batch already
//!   being dispatched completes before the loop exits.
//! - A destination failure never stops the loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::{select, time};
use tokio_util::sync::CancellationToken;

use crate::dispatch::Dispatcher;
use crate::events::Event;
use crate::queue::EventQueue;

/// Background batch former.
pub(crate) struct Batcher {
    pub queue: Arc<EventQueue>,
    pub dispatcher: Arc<Dispatcher>,
    pub batch_size: usize,
    pub flush_interval: Duration,
}

impl Batcher {
    /// Runs until `token` is cancelled or the queue is closed and empty.
    pub async fn run(self, token: CancellationToken) {
        tracing::debug!(
            batch_size = self.batch_size,
            flush_interval_ms = self.flush_interval.as_millis() as u64,
            "batching loop started"
        );

        loop {
            let batch = select! {
                biased;
                _ = token.cancelled() => break,
                batch = self.queue.take_between(self.batch_size, self.batch_size) => batch,
                batch = self.after_interval() => batch,
            };

            if batch.is_empty() {
                if self.queue.is_shutdown() {
                    break;
                }
                continue;
            }

            if let Err(e) = self.dispatcher.dispatch(&batch).await {
                tracing::debug!(error = %e, label = e.as_label(), "batch dropped");
            }
        }

        tracing::debug!("batching loop stopped");
    }

    async fn after_interval(&self) -> Vec<Event> {
        time::sleep(self.flush_interval).await;
        self.queue.take_up_to(self.batch_size)
    }
}
