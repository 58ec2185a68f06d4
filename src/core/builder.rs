use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::batcher::Batcher;
use super::tracker::{IdGenerator, Tracker};
use crate::{
    core::TrackerConfig,
    dispatch::{Dispatcher, ErrorCallback},
    error::TransportError,
    events::Event,
    middleware::Middleware,
    queue::EventQueue,
    transports::TransportRef,
};

/// Builder for constructing a [`Tracker`] with destinations, middleware and callbacks.
pub struct TrackerBuilder {
    cfg: TrackerConfig,
    transports: Vec<TransportRef>,
    middleware: Vec<Middleware>,
    on_error: Option<ErrorCallback>,
    id_generator: Option<IdGenerator>,
}

impl TrackerBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: TrackerConfig) -> Self {
        Self {
            cfg,
            transports: Vec::new(),
            middleware: Vec::new(),
            on_error: None,
            id_generator: None,
        }
    }

    /// Replaces the set of destinations.
    pub fn with_transports(mut self, transports: Vec<TransportRef>) -> Self {
        self.transports = transports;
        self
    }

    /// Adds one destination.
    pub fn with_transport(mut self, transport: TransportRef) -> Self {
        self.transports.push(transport);
        self
    }

    /// Appends a middleware unit; units run in the order they were added.
    pub fn with_middleware(mut self, middleware: Middleware) -> Self {
        self.middleware.push(middleware);
        self
    }

    /// Sets the callback invoked for every destination that finally failed a batch.
    ///
    /// Defaults to a no-op.
    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: Fn(&TransportError, &[Event]) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(f));
        self
    }

    /// Sets the event id generator.
    ///
    /// Defaults to random UUID v4 strings.
    pub fn id_generator<F>(mut self, f: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        self.id_generator = Some(Arc::new(f));
        self
    }

    /// Builds the tracker and starts its batching loop.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn build(self) -> Arc<Tracker> {
        let cfg = self.cfg.resolved();
        let queue = Arc::new(EventQueue::new(cfg.queue_capacity, cfg.queue_strategy));

        let on_error: ErrorCallback = self
            .on_error
            .unwrap_or_else(|| Arc::new(|_: &TransportError, _: &[Event]| {}));
        let dispatcher = Arc::new(Dispatcher::new(
            self.transports,
            cfg.backoff(),
            cfg.retry_attempts,
            on_error,
        ));
        let id_generator: IdGenerator = self
            .id_generator
            .unwrap_or_else(|| Arc::new(|| uuid::Uuid::new_v4().to_string()));

        let batcher = Batcher {
            queue: Arc::clone(&queue),
            dispatcher: Arc::clone(&dispatcher),
            batch_size: cfg.batch_size,
            flush_interval: cfg.flush_interval,
        };
        let loop_token = CancellationToken::new();
        let handle = tokio::spawn(batcher.run(loop_token.clone()));

        Arc::new(Tracker::new_internal(
            cfg,
            queue,
            dispatcher,
            Middleware::compose(self.middleware),
            id_generator,
            loop_token,
            handle,
        ))
    }
}
