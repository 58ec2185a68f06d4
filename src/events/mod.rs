//! Tracked events: the immutable record that flows through the pipeline.
//!
//! ## Contents
//! - [`Event`] one tracked occurrence (id, name, timestamp, payload, metadata)
//! - [`Payload`], [`Metadata`] the JSON value types carried by an event
//!
//! ## Quick reference
//! - **Producers**: [`Tracker::track`](crate::Tracker::track) builds events;
//!   [`Middleware`](crate::Middleware) units replace them with transformed copies.
//! - **Consumers**: the event queue, the dispatcher and every registered transport.

mod event;

pub use event::{Event, Metadata, Payload};
