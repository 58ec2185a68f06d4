//! # Delivery destinations.
//!
//! ## Contents
//! - [`Transport`] trait every destination implements
//! - [`TransportFn`] closure-backed transport
//! - [`TransportRef`] shared handle (`Arc<dyn Transport>`)
//! - `LogTransport` (feature `logging`) demo sink writing through `tracing`

mod transport;
mod transport_fn;

#[cfg(feature = "logging")]
mod log;

pub use transport::{Transport, TransportRef};
pub use transport_fn::TransportFn;

#[cfg(feature = "logging")]
pub use log::LogTransport;
