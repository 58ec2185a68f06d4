//! # Tracker: public surface of the pipeline.
//!
//! The [`Tracker`] owns one [`EventQueue`], one [`Dispatcher`], the composed
//! [`Middleware`] chain and the handle of its background batching loop. Nothing
//! is shared between tracker instances.
//!
//! ## Lifecycle
//! ```text
//! TrackerBuilder::build() ──► Running ──shutdown()──► ShuttingDown ──► Shutdown
//!                              │                        │
//!                              │ track / track_with     ├─► cancel batching loop
//!                              │ flush                  ├─► close queue (blocked producers get Closed)
//!                              │                        ├─► wait for loop exit ┐ bounded by
//!                              │                        ├─► flush remainder    ┘ shutdown_timeout
//!                              │                        └─► mark Shutdown, wake waiters
//! ```
//!
//! ## Track path
//! ```text
//! track_with(name, payload, extra)
//!   ├─► Event { id: id_generator(), timestamp: now, metadata: static ⊕ extra }
//!   ├─► middleware.apply(event) ─► None ─► dropped (Ok)
//!   └─► queue.offer(event)      ─► false ─► dropped/refused (Ok)
//! ```
//!
//! ## Rules
//! - `track` after shutdown began returns [`TrackerError::Closed`], including a
//!   producer that was waiting for queue space when the queue closed. Queue-full
//!   refusals and middleware drops are never reported to the caller.
//! - The queue closes before the final drain, so nothing is admitted after it.
//! - Dropping the `shutdown` future midway still completes the state transition.
//! - `shutdown` is idempotent: the first call runs the sequence, concurrent or
//!   later calls wait for it to complete and return `Ok(())`.
//! - The shutdown timeout is swallowed (logged); only an all-destinations-failed
//!   dispatch surfaces as an error.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::task::{AbortHandle, JoinHandle};
use tokio::time;
use tokio_util::sync::CancellationToken;

use super::builder::TrackerBuilder;
use crate::{
    core::TrackerConfig,
    dispatch::{DispatchReport, Dispatcher},
    error::TrackerError,
    events::{Event, Metadata, Payload},
    middleware::Middleware,
    queue::EventQueue,
};

/// Produces a fresh, unique event id per tracked call.
pub type IdGenerator = Arc<dyn Fn() -> String + Send + Sync + 'static>;

const RUNNING: u8 = 0;
const SHUTTING_DOWN: u8 = 1;
const SHUTDOWN: u8 = 2;

/// Observable lifecycle state of a [`Tracker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    /// Accepting events; the batching loop is alive.
    Running,
    /// `shutdown` is draining the queue.
    ShuttingDown,
    /// Terminal: the loop is gone and the queue is closed.
    Shutdown,
}

/// Event tracker: builds events, filters them, queues them and dispatches batches.
pub struct Tracker {
    cfg: TrackerConfig,
    queue: Arc<EventQueue>,
    dispatcher: Arc<Dispatcher>,
    middleware: Middleware,
    id_generator: IdGenerator,

    state: AtomicU8,
    /// Cancels the batching loop.
    loop_token: CancellationToken,
    /// Cancelled once the tracker reaches [`TrackerState::Shutdown`].
    closed: CancellationToken,
    batcher: Mutex<Option<JoinHandle<()>>>,
}

impl Tracker {
    /// Returns a [`TrackerBuilder`] for the given configuration.
    ///
    /// # Example
    /// ```rust
    /// use std::time::Duration;
    /// use serde_json::json;
    /// use batchvisor::{Event, Tracker, TrackerConfig, TransportError, TransportFn};
    ///
    /// #[tokio::main(flavor = "current_thread")]
    /// async fn main() -> Result<(), batchvisor::TrackerError> {
    ///     let cfg = TrackerConfig {
    ///         batch_size: 50,
    ///         flush_interval: Duration::from_secs(1),
    ///         ..TrackerConfig::default()
    ///     };
    ///
    ///     let tracker = Tracker::builder(cfg)
    ///         .with_transport(TransportFn::arc("noop", |_batch: Vec<Event>| async {
    ///             Ok::<_, TransportError>(())
    ///         }))
    ///         .build();
    ///
    ///     tracker.track("signup", json!({ "plan": "pro" })).await?;
    ///     tracker.shutdown().await
    /// }
    /// ```
    pub fn builder(cfg: TrackerConfig) -> TrackerBuilder {
        TrackerBuilder::new(cfg)
    }

    pub(crate) fn new_internal(
        cfg: TrackerConfig,
        queue: Arc<EventQueue>,
        dispatcher: Arc<Dispatcher>,
        middleware: Middleware,
        id_generator: IdGenerator,
        loop_token: CancellationToken,
        batcher: JoinHandle<()>,
    ) -> Self {
        Self {
            cfg,
            queue,
            dispatcher,
            middleware,
            id_generator,
            state: AtomicU8::new(RUNNING),
            loop_token,
            closed: CancellationToken::new(),
            batcher: Mutex::new(Some(batcher)),
        }
    }

    /// Tracks one event with the static metadata only.
    pub async fn track(
        &self,
        name: impl Into<String>,
        payload: Payload,
    ) -> Result<(), TrackerError> {
        self.track_with(name, payload, Metadata::new()).await
    }

    /// Tracks one event, merging `extra` over the static metadata before middleware runs.
    ///
    /// Under [`QueueStrategy::Bounded`](crate::QueueStrategy::Bounded) this waits for
    /// queue space; otherwise it never suspends.
    pub async fn track_with(
        &self,
        name: impl Into<String>,
        payload: Payload,
        extra: Metadata,
    ) -> Result<(), TrackerError> {
        if self.state() != TrackerState::Running {
            return Err(TrackerError::Closed);
        }

        let event = Event::new((self.id_generator)(), name, payload)
            .merge_metadata(self.cfg.static_metadata.clone())
            .merge_metadata(extra);

        let Some(event) = self.middleware.apply(event) else {
            tracing::trace!("event dropped by middleware");
            return Ok(());
        };

        let id = event.id().to_string();
        if !self.queue.offer(event).await {
            if self.queue.is_shutdown() {
                return Err(TrackerError::Closed);
            }
            tracing::debug!(
                id = %id,
                strategy = self.queue.strategy().as_label(),
                "event not queued"
            );
        }
        Ok(())
    }

    /// Drains everything queued and dispatches it as one batch, regardless of
    /// `batch_size`. Waits for every destination to settle (retries included).
    pub async fn flush(&self) -> Result<DispatchReport, TrackerError> {
        let batch = self.queue.take_all();
        Ok(self.dispatcher.dispatch(&batch).await?)
    }

    /// Stops the batching loop, closes the queue and drains what remains once
    /// (bounded by `shutdown_timeout`).
    ///
    /// Idempotent. Returns an error only if the final batch reached no destination.
    /// If the returned future is dropped midway, the tracker still reaches
    /// [`TrackerState::Shutdown`] and the undrained events are abandoned.
    pub async fn shutdown(&self) -> Result<(), TrackerError> {
        if self
            .state
            .compare_exchange(RUNNING, SHUTTING_DOWN, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            self.closed.cancelled().await;
            return Ok(());
        }
        tracing::debug!(queued = self.queue.size(), "tracker shutdown requested");

        self.loop_token.cancel();
        self.queue.shutdown();
        let batcher = self
            .batcher
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let mut guard = ShutdownGuard {
            tracker: self,
            loop_abort: batcher.as_ref().map(JoinHandle::abort_handle),
            drained: false,
        };

        let drain = async {
            if let Some(handle) = batcher {
                if let Err(e) = handle.await {
                    tracing::warn!(error = %e, "batching loop terminated abnormally");
                }
            }
            self.flush().await.map(|_| ())
        };

        let res = match time::timeout(self.cfg.shutdown_timeout, drain).await {
            Ok(res) => res,
            Err(_elapsed) => {
                tracing::warn!(
                    timeout_ms = self.cfg.shutdown_timeout.as_millis() as u64,
                    "shutdown timeout exceeded"
                );
                guard.abandon();
                Ok(())
            }
        };
        guard.drained = true;
        drop(guard);

        tracing::debug!("tracker shut down");
        res
    }

    /// Current lifecycle state.
    pub fn state(&self) -> TrackerState {
        match self.state.load(Ordering::Acquire) {
            RUNNING => TrackerState::Running,
            SHUTTING_DOWN => TrackerState::ShuttingDown,
            _ => TrackerState::Shutdown,
        }
    }

    /// True once the tracker reached [`TrackerState::Shutdown`].
    pub fn is_shutdown(&self) -> bool {
        self.state() == TrackerState::Shutdown
    }

    /// Number of events waiting in the queue (advisory).
    pub fn queued(&self) -> usize {
        self.queue.size()
    }

    /// Resolved configuration.
    pub fn config(&self) -> &TrackerConfig {
        &self.cfg
    }
}

/// Finishes the shutdown sequence when dropped, whether `shutdown` completed
/// or its future was cancelled.
struct ShutdownGuard<'a> {
    tracker: &'a Tracker,
    loop_abort: Option<AbortHandle>,
    drained: bool,
}

impl ShutdownGuard<'_> {
    /// Stops the loop and gives up on whatever is still queued.
    fn abandon(&mut self) {
        if let Some(abort) = self.loop_abort.take() {
            abort.abort();
        }
        let abandoned = self.tracker.queue.take_all().len();
        if abandoned > 0 {
            tracing::warn!(abandoned, "remaining events abandoned");
        }
    }
}

impl Drop for ShutdownGuard<'_> {
    fn drop(&mut self) {
        if !self.drained {
            tracing::warn!("shutdown interrupted before the final drain completed");
            self.abandon();
        }
        self.tracker.queue.shutdown();
        self.tracker.state.store(SHUTDOWN, Ordering::Release);
        self.tracker.closed.cancel();
    }
}

impl Drop for Tracker {
    fn drop(&mut self) {
        if self.state() == TrackerState::Shutdown {
            return;
        }
        let pending = self.queue.size();
        if pending > 0 {
            tracing::warn!(pending, "tracker dropped without shutdown; queued events lost");
        }
        self.loop_token.cancel();
        self.queue.shutdown();
    }
}

impl fmt::Debug for Tracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracker")
            .field("state", &self.state())
            .field("queue", &self.queue)
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DispatchError, TransportError};
    use crate::queue::QueueStrategy;
    use crate::transports::{TransportFn, TransportRef};
    use serde_json::json;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    type Batches = Arc<Mutex<Vec<Vec<String>>>>;

    fn recording(name: &'static str) -> (TransportRef, Batches) {
        let batches: Batches = Arc::new(Mutex::new(Vec::new()));
        let t = {
            let batches = batches.clone();
            TransportFn::arc(name, move |batch: Vec<Event>| {
                batches
                    .lock()
                    .unwrap()
                    .push(batch.iter().map(|e| e.name().to_string()).collect());
                async { Ok::<(), TransportError>(()) }
            })
        };
        (t, batches)
    }

    fn failing(name: &'static str) -> TransportRef {
        TransportFn::arc(name, move |_batch: Vec<Event>| async move {
            Err::<(), _>(TransportError::fatal(name, "rejected"))
        })
    }

    fn cfg(batch_size: usize, flush_ms: u64) -> TrackerConfig {
        TrackerConfig {
            batch_size,
            flush_interval: Duration::from_millis(flush_ms),
            retry_base_delay: Duration::from_millis(1),
            ..TrackerConfig::default()
        }
    }

    fn flatten(batches: &Batches) -> Vec<String> {
        batches.lock().unwrap().iter().flatten().cloned().collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_batch_dispatched_without_waiting_for_interval() {
        let (t, batches) = recording("rec");
        let tracker = Tracker::builder(cfg(2, 10_000)).with_transport(t).build();
        let start = time::Instant::now();

        tracker.track("a", json!(1)).await.unwrap();
        tracker.track("b", json!(2)).await.unwrap();
        time::sleep(Duration::from_millis(1)).await;

        assert_eq!(*batches.lock().unwrap(), vec![vec!["a", "b"]]);
        assert!(start.elapsed() < Duration::from_secs(10));
        tracker.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_partial_batch_dispatched_after_interval() {
        let (t, batches) = recording("rec");
        let tracker = Tracker::builder(cfg(100, 50)).with_transport(t).build();

        tracker.track("only", json!(null)).await.unwrap();
        time::sleep(Duration::from_millis(60)).await;

        assert_eq!(*batches.lock().unwrap(), vec![vec!["only"]]);
        tracker.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_order_preserved_across_batches() {
        let (t, batches) = recording("rec");
        let tracker = Tracker::builder(cfg(3, 50)).with_transport(t).build();

        let names: Vec<String> = (0..8).map(|i| format!("e{i}")).collect();
        for name in &names {
            tracker.track(name.clone(), json!(null)).await.unwrap();
        }
        time::sleep(Duration::from_millis(200)).await;
        tracker.shutdown().await.unwrap();

        assert_eq!(flatten(&batches), names);
        assert!(batches.lock().unwrap().iter().all(|b| b.len() <= 3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_filtered_event_never_queued() {
        let marks = Arc::new(AtomicUsize::new(0));
        let (t, batches) = recording("rec");
        let tracker = Tracker::builder(cfg(1, 50))
            .with_transport(t)
            .with_middleware(Middleware::filter(|_| false))
            .with_middleware(Middleware::tap({
                let marks = marks.clone();
                move |_| {
                    marks.fetch_add(1, Ordering::SeqCst);
                }
            }))
            .build();

        tracker.track("x", json!(null)).await.unwrap();
        assert_eq!(tracker.queued(), 0);
        time::sleep(Duration::from_millis(100)).await;
        tracker.shutdown().await.unwrap();

        assert_eq!(marks.load(Ordering::SeqCst), 0);
        assert!(batches.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_metadata_merge_precedence() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let t: TransportRef = {
            let seen = seen.clone();
            TransportFn::arc("meta", move |batch: Vec<Event>| {
                seen.lock().unwrap().extend(batch);
                async { Ok::<(), TransportError>(()) }
            })
        };
        let mut config = cfg(1, 50);
        config.static_metadata = Metadata::from([
            ("a".to_string(), json!(0)),
            ("b".to_string(), json!(2)),
        ]);
        let tracker = Tracker::builder(config)
            .with_transport(t)
            .with_middleware(Middleware::add_metadata([("c", json!(3))]))
            .build();

        let extra = Metadata::from([("a".to_string(), json!(1))]);
        tracker.track_with("m", json!(null), extra).await.unwrap();
        tracker.shutdown().await.unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let expected = Metadata::from([
            ("a".to_string(), json!(1)),
            ("b".to_string(), json!(2)),
            ("c".to_string(), json!(3)),
        ]);
        assert_eq!(seen[0].metadata(), &expected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ids_come_from_generator() {
        let counter = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let t: TransportRef = {
            let seen = seen.clone();
            TransportFn::arc("ids", move |batch: Vec<Event>| {
                seen.lock()
                    .unwrap()
                    .extend(batch.iter().map(|e| e.id().to_string()));
                async { Ok::<(), TransportError>(()) }
            })
        };
        let tracker = Tracker::builder(cfg(10, 50))
            .with_transport(t)
            .id_generator({
                let counter = counter.clone();
                move || format!("id-{}", counter.fetch_add(1, Ordering::SeqCst))
            })
            .build();

        tracker.track("a", json!(null)).await.unwrap();
        tracker.track("b", json!(null)).await.unwrap();
        tracker.shutdown().await.unwrap();

        assert_eq!(*seen.lock().unwrap(), vec!["id-0", "id-1"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_shutdown_delivers_exactly_once() {
        let (t, batches) = recording("rec");
        let tracker = Tracker::builder(cfg(2, 10_000)).with_transport(t).build();

        for name in ["a", "b", "c"] {
            tracker.track(name, json!(null)).await.unwrap();
        }
        tracker.shutdown().await.unwrap();
        tracker.shutdown().await.unwrap();
        tracker.shutdown().await.unwrap();

        assert_eq!(flatten(&batches), vec!["a", "b", "c"]);
        assert!(tracker.is_shutdown());
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_shutdown_waits_for_first() {
        let (t, batches) = recording("rec");
        let tracker = Tracker::builder(cfg(10, 10_000)).with_transport(t).build();
        tracker.track("a", json!(null)).await.unwrap();

        let (r1, r2) = tokio::join!(tracker.shutdown(), tracker.shutdown());
        assert!(r1.is_ok() && r2.is_ok());
        assert!(tracker.is_shutdown());
        assert_eq!(flatten(&batches), vec!["a"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_track_after_shutdown_is_rejected() {
        let (t, _) = recording("rec");
        let tracker = Tracker::builder(cfg(10, 50)).with_transport(t).build();
        tracker.shutdown().await.unwrap();

        let err = tracker.track("late", json!(null)).await.unwrap_err();
        assert!(matches!(err, TrackerError::Closed));
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_timeout_is_swallowed() {
        let t: TransportRef = TransportFn::arc("stuck", |_batch: Vec<Event>| async {
            std::future::pending::<()>().await;
            Ok::<(), TransportError>(())
        });
        let mut config = cfg(10, 10_000);
        config.shutdown_timeout = Duration::from_millis(100);
        let tracker = Tracker::builder(config).with_transport(t).build();
        tracker.track("a", json!(null)).await.unwrap();

        let start = time::Instant::now();
        tracker.shutdown().await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(100));
        assert!(tracker.is_shutdown());
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_surfaces_all_failed() {
        let errors = Arc::new(AtomicUsize::new(0));
        let tracker = Tracker::builder(cfg(10, 10_000))
            .with_transport(failing("down"))
            .on_error({
                let errors = errors.clone();
                move |_, _| {
                    errors.fetch_add(1, Ordering::SeqCst);
                }
            })
            .build();
        tracker.track("a", json!(null)).await.unwrap();

        let err = tracker.flush().await.unwrap_err();
        assert!(matches!(
            err,
            TrackerError::Dispatch(DispatchError::AllFailed { .. })
        ));
        assert_eq!(errors.load(Ordering::SeqCst), 1);
        tracker.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_partial_failure_is_ok() {
        let errors = Arc::new(AtomicUsize::new(0));
        let (good, batches) = recording("good");
        let tracker = Tracker::builder(cfg(10, 10_000))
            .with_transports(vec![failing("bad"), good])
            .on_error({
                let errors = errors.clone();
                move |err, batch| {
                    assert_eq!(err.transport, "bad");
                    assert_eq!(batch.len(), 2);
                    errors.fetch_add(1, Ordering::SeqCst);
                }
            })
            .build();
        tracker.track("a", json!(null)).await.unwrap();
        tracker.track("b", json!(null)).await.unwrap();

        let report = tracker.flush().await.expect("partial success");
        assert!(report.is_partial());
        assert_eq!(errors.load(Ordering::SeqCst), 1);
        assert_eq!(flatten(&batches), vec!["a", "b"]);
        tracker.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_surfaces_final_dispatch_failure() {
        let tracker = Tracker::builder(cfg(10, 10_000))
            .with_transport(failing("down"))
            .build();
        tracker.track("a", json!(null)).await.unwrap();

        assert!(matches!(
            tracker.shutdown().await,
            Err(TrackerError::Dispatch(_))
        ));
        assert!(tracker.is_shutdown());
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_survives_destination_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let t: TransportRef = {
            let calls = calls.clone();
            TransportFn::arc("flaky", move |_batch: Vec<Event>| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n == 0 {
                        Err(TransportError::fatal("flaky", "first batch rejected"))
                    } else {
                        Ok(())
                    }
                }
            })
        };
        let tracker = Tracker::builder(cfg(1, 10_000)).with_transport(t).build();

        tracker.track("a", json!(null)).await.unwrap();
        time::sleep(Duration::from_millis(1)).await;
        tracker.track("b", json!(null)).await.unwrap();
        time::sleep(Duration::from_millis(1)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.state(), TrackerState::Running);
        tracker.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_queue_applies_backpressure() {
        let (t, batches) = recording("rec");
        let mut config = cfg(2, 10_000);
        config.queue_capacity = 2;
        config.queue_strategy = QueueStrategy::Bounded;
        let tracker = Tracker::builder(config).with_transport(t).build();

        for name in ["a", "b", "c", "d", "e"] {
            tracker.track(name, json!(null)).await.unwrap();
        }
        tracker.shutdown().await.unwrap();

        assert_eq!(flatten(&batches), vec!["a", "b", "c", "d", "e"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_shutdown_still_reaches_shutdown() {
        let t: TransportRef = TransportFn::arc("slow", |_batch: Vec<Event>| async {
            time::sleep(Duration::from_secs(5)).await;
            Ok::<(), TransportError>(())
        });
        let tracker = Tracker::builder(cfg(10, 10_000)).with_transport(t).build();
        tracker.track("a", json!(null)).await.unwrap();

        let first = time::timeout(Duration::from_secs(1), tracker.shutdown()).await;
        assert!(first.is_err());
        assert_eq!(tracker.state(), TrackerState::Shutdown);
        assert!(tracker.queue.is_shutdown());

        let again = time::timeout(Duration::from_secs(3600), tracker.shutdown()).await;
        assert!(matches!(again, Ok(Ok(()))));
        assert!(matches!(
            tracker.track("late", json!(null)).await,
            Err(TrackerError::Closed)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_producer_waiting_for_space_is_rejected_on_shutdown() {
        let (t, batches) = recording("rec");
        let mut config = cfg(10, 10_000);
        config.queue_capacity = 1;
        config.queue_strategy = QueueStrategy::Bounded;
        let tracker = Tracker::builder(config).with_transport(t).build();
        tracker.track("a", json!(null)).await.unwrap();

        let blocked = tokio::spawn({
            let tracker = Arc::clone(&tracker);
            async move { tracker.track("b", json!(null)).await }
        });
        time::sleep(Duration::from_millis(1)).await;
        assert!(!blocked.is_finished());

        tracker.shutdown().await.unwrap();

        let res = blocked.await.unwrap();
        assert!(matches!(res, Err(TrackerError::Closed)));
        assert_eq!(flatten(&batches), vec!["a"]);
        assert_eq!(tracker.queued(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_without_shutdown_stops_loop_and_closes_queue() {
        let (t, batches) = recording("rec");
        let tracker = Tracker::builder(cfg(10, 50)).with_transport(t).build();
        tracker.track("a", json!(null)).await.unwrap();
        let queue = Arc::clone(&tracker.queue);

        drop(tracker);
        time::sleep(Duration::from_millis(200)).await;

        assert!(queue.is_shutdown());
        assert_eq!(Arc::strong_count(&queue), 1);
        assert!(batches.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_during_dispatch_delivers_each_event_once() {
        let batches: Batches = Arc::new(Mutex::new(Vec::new()));
        let t: TransportRef = {
            let batches = batches.clone();
            TransportFn::arc("slow", move |batch: Vec<Event>| {
                let batches = batches.clone();
                async move {
                    time::sleep(Duration::from_millis(100)).await;
                    batches
                        .lock()
                        .unwrap()
                        .push(batch.iter().map(|e| e.name().to_string()).collect());
                    Ok::<(), TransportError>(())
                }
            })
        };
        let tracker = Tracker::builder(cfg(2, 10_000)).with_transport(t).build();

        tracker.track("a", json!(null)).await.unwrap();
        tracker.track("b", json!(null)).await.unwrap();
        time::sleep(Duration::from_millis(1)).await;
        tracker.track("c", json!(null)).await.unwrap();
        assert_eq!(tracker.queued(), 1);

        tracker.shutdown().await.unwrap();

        assert_eq!(*batches.lock().unwrap(), vec![vec!["a", "b"], vec!["c"]]);
    }
}
