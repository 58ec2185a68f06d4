//! # batchvisor
//!
//! **Batchvisor** is a small asynchronous event-tracking pipeline for Rust.
//!
//! Producers record named events with a JSON payload. Each event is enriched
//! with metadata, passed through a middleware chain, buffered in a bounded
//! queue, grouped into batches and fanned out to every registered destination
//! concurrently, with per-destination retries and exponential backoff.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   tracker.track(name, payload) / track_with(.., extra)
//!            │
//!            ▼
//! ┌──────────────────────────────────────────────┐
//! │  Tracker                                     │
//! │  - id generator (uuid v4 by default)         │
//! │  - static metadata ◄── extra (extra wins)    │
//! │  - Middleware chain (transform / drop)       │
//! └──────────────────────┬───────────────────────┘
//!                        ▼
//! ┌──────────────────────────────────────────────┐
//! │  EventQueue (capacity + QueueStrategy)       │
//! │  Bounded: wait │ Dropping: reject │ Sliding  │
//! └──────────────────────┬───────────────────────┘
//!                        ▼
//!            ┌────────────────────────┐
//!            │  batching loop         │
//!            │  full batch  OR        │
//!            │  flush_interval tick   │
//!            └───────────┬────────────┘
//!                        ▼
//!            ┌────────────────────────┐
//!            │  Dispatcher (fan-out)  │
//!            └──┬─────────┬────────┬──┘
//!               ▼         ▼        ▼
//!          transport1 transport2 transportN
//!          (retry +   (retry +   (retry +
//!           backoff)   backoff)   backoff)
//!               │         │        │
//!               └─ final failure ─► on_error(err, batch)
//! ```
//!
//! ### Lifecycle
//! ```text
//! TrackerBuilder::build() ──► Running ──► shutdown() ──► ShuttingDown ──► Shutdown
//!
//! shutdown():
//!   ├─► reject new track calls (TrackerError::Closed)
//!   ├─► cancel the batching loop (an in-flight batch completes)
//!   ├─► close the queue (producers waiting for space get TrackerError::Closed)
//!   ├─► dispatch the remainder as one final batch
//!   │     └─ loop exit + final batch bounded by shutdown_timeout;
//!   │        on expiry remaining events are abandoned
//!   └─► Shutdown (repeat callers just wait for completion;
//!        a cancelled shutdown future still ends in Shutdown)
//! ```
//!
//! ## Features
//! | Area          | Description                                                     | Key types / traits                  |
//! |---------------|-----------------------------------------------------------------|-------------------------------------|
//! | **Tracking**  | Build, enrich and enqueue events.                               | [`Tracker`], [`Event`]              |
//! | **Middleware**| Transform or drop events before they are queued.                | [`Middleware`]                      |
//! | **Queueing**  | Bounded buffer with wait, drop-newest or evict-oldest overflow. | [`EventQueue`], [`QueueStrategy`]   |
//! | **Delivery**  | Concurrent fan-out with per-destination retry.                  | [`Dispatcher`], [`Transport`]       |
//! | **Policies**  | Exponential backoff with jitter.                                | [`BackoffPolicy`], [`JitterPolicy`] |
//! | **Config**    | Batch size, intervals, capacity, retry and shutdown settings.   | [`TrackerConfig`]                   |
//!
//! ## Optional features
//! - `logging`: exports [`LogTransport`], a destination that writes batches through `tracing`.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//!
//! use batchvisor::{Event, Middleware, Tracker, TrackerConfig, TrackerError, TransportError, TransportFn};
//! use serde_json::json;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), TrackerError> {
//!     let cfg = TrackerConfig {
//!         batch_size: 2,
//!         flush_interval: Duration::from_millis(50),
//!         ..TrackerConfig::default()
//!     };
//!
//!     let stdout = TransportFn::arc("stdout", |batch: Vec<Event>| async move {
//!         for ev in &batch {
//!             println!("{} {}", ev.name(), ev.payload());
//!         }
//!         Ok::<(), TransportError>(())
//!     });
//!
//!     let tracker = Tracker::builder(cfg)
//!         .with_transport(stdout)
//!         .with_middleware(Middleware::filter(|ev| ev.name() != "noise"))
//!         .build();
//!
//!     tracker.track("signup", json!({ "plan": "pro" })).await?;
//!     tracker.track("noise", json!(null)).await?;
//!     tracker.track("login", json!({ "user": 7 })).await?;
//!
//!     tracker.shutdown().await?;
//!     Ok(())
//! }
//! ```
mod core;
mod dispatch;
mod error;
mod events;
mod middleware;
mod policies;
mod queue;
mod transports;

// ---- Public re-exports ----

pub use core::{IdGenerator, Tracker, TrackerBuilder, TrackerConfig, TrackerState};
pub use dispatch::{DispatchReport, Dispatcher, ErrorCallback, TransportOutcome};
pub use error::{DispatchError, TrackerError, TransportError};
pub use events::{Event, Metadata, Payload};
pub use middleware::Middleware;
pub use policies::{BackoffPolicy, JitterPolicy};
pub use queue::{EventQueue, QueueStrategy};
pub use transports::{Transport, TransportFn, TransportRef};

// Optional: expose a simple built-in logging destination (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use transports::LogTransport;
