//! # Example: basic_tracker
//!
//! Tracks a handful of events through a middleware chain into the built-in
//! [`LogTransport`], then shuts down and drains whatever is still queued.
//!
//! ## Flow
//! ```text
//! track("page_view") ─► add_metadata{app} ─► drop "debug.*" ─► queue
//!                                                              │
//!              batch_size=3 reached ─► LogTransport ◄──────────┤
//!              shutdown() drains rest ─► LogTransport ◄────────┘
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example basic_tracker --features logging
//! ```

use std::{sync::Arc, time::Duration};

use batchvisor::{LogTransport, Metadata, Middleware, Tracker, TrackerConfig};
use serde_json::json;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_target(false)
        .init();

    // 1. Small batches so the size trigger fires quickly
    let cfg = TrackerConfig {
        batch_size: 3,
        flush_interval: Duration::from_millis(500),
        static_metadata: Metadata::from([("env".to_string(), json!("demo"))]),
        ..TrackerConfig::default()
    };

    // 2. Middleware: tag every event, drop debug noise
    let tag = Middleware::add_metadata([("app", json!("basic_tracker"))]);
    let no_debug = Middleware::filter(|ev| !ev.name().starts_with("debug."));

    let tracker = Tracker::builder(cfg)
        .with_transport(Arc::new(LogTransport::new()))
        .with_middleware(tag)
        .with_middleware(no_debug)
        .build();

    // 3. Three events fill a batch and go out immediately
    tracker.track("page_view", json!({ "path": "/" })).await?;
    tracker.track("debug.render", json!({ "ms": 4 })).await?;
    tracker.track("page_view", json!({ "path": "/pricing" })).await?;
    tracker.track("click", json!({ "id": "buy" })).await?;

    // 4. Two more stay queued until shutdown drains them
    let mut extra = Metadata::new();
    extra.insert("env".into(), json!("override"));
    tracker.track_with("signup", json!({ "plan": "pro" }), extra).await?;
    tracker.track("logout", json!(null)).await?;

    tokio::time::sleep(Duration::from_millis(50)).await;
    println!("queued before shutdown: {}", tracker.queued());

    tracker.shutdown().await?;
    println!("state after shutdown: {:?}", tracker.state());
    Ok(())
}
