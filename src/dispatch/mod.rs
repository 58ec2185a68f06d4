//! Batch fan-out to destinations.
//!
//! ## Contents
//! - [`Dispatcher`] concurrent delivery with per-destination retry
//! - [`DispatchReport`], [`TransportOutcome`] per-destination results
//! - [`ErrorCallback`] hook invoked for every destination that finally failed

mod dispatcher;
mod report;

pub use dispatcher::{Dispatcher, ErrorCallback};
pub use report::{DispatchReport, TransportOutcome};
