//! # Destination abstraction.
//!
//! This module defines the [`Transport`] trait: a named sink that accepts a batch
//! of events. Concrete delivery mechanisms (HTTP, message brokers, files) live
//! outside this crate and implement the trait.
//!
//! The common handle type is [`TransportRef`], an `Arc<dyn Transport>` shared by
//! the dispatcher across concurrent deliveries.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::TransportError;
use crate::events::Event;

/// Shared handle to a destination.
pub type TransportRef = Arc<dyn Transport>;

/// # Named batch sink.
///
/// Implementations decide whether a failure is transient by setting
/// [`TransportError::retryable`]; the dispatcher only retries those.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use batchvisor::{Event, Transport, TransportError};
///
/// struct Stdout;
///
/// #[async_trait]
/// impl Transport for Stdout {
///     fn name(&self) -> &str { "stdout" }
///
///     async fn send(&self, batch: &[Event]) -> Result<(), TransportError> {
///         for ev in batch {
///             println!("{} {}", ev.name(), ev.payload());
///         }
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Stable, human-readable destination name (used in errors and logs).
    fn name(&self) -> &str;

    /// Delivers one batch. Events arrive in offer order.
    async fn send(&self, batch: &[Event]) -> Result<(), TransportError>;
}
