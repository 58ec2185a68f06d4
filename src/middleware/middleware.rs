//! # Middleware: transform-or-drop units applied before enqueueing.
//!
//! A [`Middleware`] wraps a function `Fn(Event) -> Option<Event>`:
//! - `Some(event)` passes a (possibly new) event to the next unit;
//! - `None` drops the event and stops the chain.
//!
//! Units are plain values held behind an `Arc`, cheap to clone and safe to share
//! across concurrent `track` calls. A unit must not keep per-invocation state;
//! if a side effect needs shared state, capture an `Arc<...>` explicitly.
//!
//! ## Composition
//! ```text
//! compose([m1, m2, m3])(ev):
//!   m1(ev) ─► Some(e1) ─► m2(e1) ─► Some(e2) ─► m3(e2) ─► Some(e3)   → Some(e3)
//!                                  └─► None                          → None (m3 never runs)
//! ```
//!
//! ## Example
//! ```rust
//! use serde_json::json;
//! use batchvisor::{Event, Middleware};
//!
//! let chain = Middleware::compose([
//!     Middleware::filter(|ev| ev.name() != "heartbeat"),
//!     Middleware::add_metadata([("app", json!("shop"))]),
//!     Middleware::map_name(|name| name.to_uppercase()),
//! ]);
//!
//! let kept = chain.apply(Event::new("1", "click", json!(null))).unwrap();
//! assert_eq!(kept.name(), "CLICK");
//! assert_eq!(kept.metadata().get("app"), Some(&json!("shop")));
//!
//! assert!(chain.apply(Event::new("2", "heartbeat", json!(null))).is_none());
//! ```

use std::fmt;
use std::sync::Arc;

use crate::events::{Event, Metadata, Payload};

type MiddlewareFn = dyn Fn(Event) -> Option<Event> + Send + Sync + 'static;

/// One transform-or-drop step.
#[derive(Clone)]
pub struct Middleware {
    f: Arc<MiddlewareFn>,
}

impl Middleware {
    /// Wraps an arbitrary transform-or-drop function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Event) -> Option<Event> + Send + Sync + 'static,
    {
        Self { f: Arc::new(f) }
    }

    /// Runs this unit on one event. `None` means the event was dropped.
    #[inline]
    pub fn apply(&self, event: Event) -> Option<Event> {
        (self.f)(event)
    }

    /// Passes every event through unchanged.
    pub fn identity() -> Self {
        Self::new(Some)
    }

    /// Drops events for which `predicate` returns `false`.
    pub fn filter<P>(predicate: P) -> Self
    where
        P: Fn(&Event) -> bool + Send + Sync + 'static,
    {
        Self::new(move |ev| predicate(&ev).then_some(ev))
    }

    /// Merges static keys into metadata, overriding existing keys with the same name.
    pub fn add_metadata<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, serde_json::Value)>,
        K: Into<String>,
    {
        let entries: Metadata = entries.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Self::new(move |ev| Some(ev.merge_metadata(entries.clone())))
    }

    /// Merges keys computed from the event itself.
    pub fn add_metadata_from<F>(f: F) -> Self
    where
        F: Fn(&Event) -> Metadata + Send + Sync + 'static,
    {
        Self::new(move |ev| {
            let extra = f(&ev);
            Some(ev.merge_metadata(extra))
        })
    }

    /// Replaces the event name.
    pub fn map_name<F>(f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self::new(move |ev| {
            let name = f(ev.name());
            Some(ev.with_name(name))
        })
    }

    /// Replaces the event payload.
    pub fn map_payload<F>(f: F) -> Self
    where
        F: Fn(&Payload) -> Payload + Send + Sync + 'static,
    {
        Self::new(move |ev| {
            let payload = f(ev.payload());
            Some(ev.with_payload(payload))
        })
    }

    /// Replaces the whole event.
    pub fn map<F>(f: F) -> Self
    where
        F: Fn(Event) -> Event + Send + Sync + 'static,
    {
        Self::new(move |ev| Some(f(ev)))
    }

    /// Observes the event without changing it.
    pub fn tap<F>(f: F) -> Self
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        Self::new(move |ev| {
            f(&ev);
            Some(ev)
        })
    }

    /// Builds one unit applying `units` left-to-right, stopping at the first drop.
    ///
    /// Composing zero units yields [`Middleware::identity`].
    pub fn compose<I>(units: I) -> Self
    where
        I: IntoIterator<Item = Middleware>,
    {
        let mut units: Vec<Middleware> = units.into_iter().collect();
        match units.len() {
            0 => Self::identity(),
            1 => units.remove(0),
            _ => {
                let units: Arc<[Middleware]> = units.into();
                Self::new(move |ev| units.iter().try_fold(ev, |ev, m| m.apply(ev)))
            }
        }
    }

    /// Runs `self`, then `next` if the event was not dropped.
    pub fn then(self, next: Middleware) -> Self {
        Self::compose([self, next])
    }
}

impl Default for Middleware {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Debug for Middleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Middleware").finish_non_exhaustive()
    }
}
