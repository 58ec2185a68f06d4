//! # Example: fan_out_retry
//!
//! Sends every batch to two destinations at once. `primary` always succeeds;
//! `flaky` fails retryably twice per batch before accepting it, and `legacy`
//! rejects everything with a fatal error that is never retried.
//!
//! ## Flow
//! ```text
//! Dispatcher::dispatch(batch)
//!   ├─► primary ─► Ok
//!   ├─► flaky   ─► Err(retryable) ─► sleep ~50ms ─► Err(retryable) ─► sleep ~100ms ─► Ok
//!   └─► legacy  ─► Err(fatal) ─► on_error(err, batch)
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example fan_out_retry
//! ```

use std::{
    sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    },
    time::Duration,
};

use batchvisor::{
    Event, JitterPolicy, Tracker, TrackerConfig, TransportError, TransportFn, TransportRef,
};
use serde_json::json;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    // 1. Short retry schedule so the demo finishes quickly
    let cfg = TrackerConfig {
        batch_size: 2,
        flush_interval: Duration::from_millis(200),
        retry_attempts: 3,
        retry_base_delay: Duration::from_millis(50),
        retry_max_delay: Duration::from_millis(400),
        retry_jitter: JitterPolicy::Equal,
        ..TrackerConfig::default()
    };

    // 2. Destinations
    let primary: TransportRef = TransportFn::arc("primary", |batch: Vec<Event>| async move {
        println!("[primary] delivered {} events", batch.len());
        Ok::<(), TransportError>(())
    });

    let calls = Arc::new(AtomicU32::new(0));
    let flaky: TransportRef = TransportFn::arc("flaky", move |batch: Vec<Event>| {
        let calls = Arc::clone(&calls);
        async move {
            let n = calls.fetch_add(1, Ordering::Relaxed) + 1;
            if n % 3 != 0 {
                println!("[flaky] call {n}: temporary failure");
                return Err(TransportError::retryable("flaky", format!("timeout #{n}")));
            }
            println!("[flaky] call {n}: delivered {} events", batch.len());
            Ok(())
        }
    });

    let legacy: TransportRef = TransportFn::arc("legacy", |_batch: Vec<Event>| async move {
        Err::<(), _>(TransportError::fatal("legacy", "endpoint retired"))
    });

    // 3. Tracker with an error hook for final failures
    let tracker = Tracker::builder(cfg)
        .with_transports(vec![primary, flaky, legacy])
        .on_error(|err, batch| {
            println!("[on_error] {err} (batch of {})", batch.len());
        })
        .build();

    for i in 0..4 {
        tracker.track("order.created", json!({ "order": i })).await?;
    }

    // 4. Explicit flush of anything left, with a per-destination report
    tracker.track("order.cancelled", json!({ "order": 2 })).await?;
    let report = tracker.flush().await?;
    for outcome in &report.outcomes {
        println!(
            "[flush] {} after {} attempt(s): {}",
            outcome.transport,
            outcome.attempts,
            if outcome.is_delivered() { "ok" } else { "failed" }
        );
    }

    tracker.shutdown().await?;
    Ok(())
}
