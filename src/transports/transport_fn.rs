//! # Function-backed transport (`TransportFn`)
//!
//! [`TransportFn`] wraps a closure `F: Fn(Vec<Event>) -> Fut`, producing a fresh
//! future per delivery attempt. The closure receives its own copy of the batch,
//! so the future owns everything it touches and no shared mutable state is needed.
//! If attempts must share state (connection pools, counters), capture an
//! `Arc<...>` explicitly inside the closure.
//!
//! ## Example
//! ```rust
//! use batchvisor::{Event, TransportError, TransportFn, TransportRef};
//!
//! let t: TransportRef = TransportFn::arc("null", |batch: Vec<Event>| async move {
//!     let _ = batch.len();
//!     Ok::<_, TransportError>(())
//! });
//!
//! assert_eq!(t.name(), "null");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::TransportError;
use crate::events::Event;
use crate::transports::transport::Transport;

/// Function-backed transport implementation.
#[derive(Debug)]
pub struct TransportFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> TransportFn<F> {
    /// Creates a new function-backed transport.
    ///
    /// Prefer [`TransportFn::arc`] when you immediately need a [`TransportRef`](crate::TransportRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the transport and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut> Transport for TransportFn<F>
where
    F: Fn(Vec<Event>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), TransportError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn send(&self, batch: &[Event]) -> Result<(), TransportError> {
        (self.f)(batch.to_vec()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_closure_receives_batch() {
        let t = TransportFn::new("count", |batch: Vec<Event>| async move {
            if batch.len() == 2 {
                Ok(())
            } else {
                Err(TransportError::fatal("count", format!("got {}", batch.len())))
            }
        });

        let batch = vec![
            Event::new("1", "a", json!(null)),
            Event::new("2", "b", json!(null)),
        ];
        assert_eq!(t.name(), "count");
        assert!(t.send(&batch).await.is_ok());
        assert!(t.send(&batch[..1]).await.is_err());
    }
}
