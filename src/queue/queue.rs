//! # EventQueue: bounded FIFO shared by producers and the batching loop.
//!
//! [`EventQueue`] is the single synchronization point of the pipeline. Any number
//! of producers call [`offer`](EventQueue::offer); the batching loop consumes with
//! [`take_between`](EventQueue::take_between) / [`take_up_to`](EventQueue::take_up_to);
//! `flush` and `shutdown` drain with [`take_all`](EventQueue::take_all).
//!
//! ## Architecture
//! ```text
//! Producers (many):                                    Consumers:
//!   track() ──┐                                        ┌── take_between(min, max)  (suspends)
//!   track() ──┼── offer() ──► [ Mutex<VecDeque> ] ─────┼── take_up_to(n)           (never suspends)
//!   track() ──┘      ▲            │        │           └── take_all()              (never suspends)
//!                    │            │        └─► items.notify_waiters()  (wakes take_between)
//!                    └────────────┴──────────► space.notify_waiters()  (wakes bounded offer)
//! ```
//!
//! ## Rules
//! - The lock is never held across an `.await`.
//! - Waiters register with [`Notify`] **before** inspecting the buffer, so a
//!   wake-up between the check and the await is never lost.
//! - Removal happens entirely under the lock: a consumer future dropped while
//!   suspended never loses events (cancel-safe).
//! - After [`shutdown`](EventQueue::shutdown) every suspended caller wakes:
//!   `offer` returns `false`, `take_between` returns whatever is left.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;

use crate::events::Event;

use super::QueueStrategy;

struct State {
    buf: VecDeque<Event>,
    closed: bool,
}

/// Bounded event queue with a fixed overflow strategy.
pub struct EventQueue {
    state: Mutex<State>,
    capacity: usize,
    strategy: QueueStrategy,
    /// Signalled when events are added or the queue closes.
    items: Notify,
    /// Signalled when events are removed or the queue closes.
    space: Notify,
}

impl EventQueue {
    /// Creates an empty queue. Capacity is clamped to a minimum of 1.
    pub fn new(capacity: usize, strategy: QueueStrategy) -> Self {
        let capacity = capacity.max(1);
        Self {
            state: Mutex::new(State {
                buf: VecDeque::with_capacity(capacity.min(1024)),
                closed: false,
            }),
            capacity,
            strategy,
            items: Notify::new(),
            space: Notify::new(),
        }
    }

    /// Maximum number of queued events.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Overflow strategy chosen at construction.
    pub fn strategy(&self) -> QueueStrategy {
        self.strategy
    }

    /// Attempts to add one event. Returns `true` if it was accepted.
    ///
    /// ### Behavior when full
    /// - `Bounded`: suspends until space frees up; returns `false` only if the
    ///   queue shuts down while waiting.
    /// - `Dropping`: returns `false` immediately, queue untouched.
    /// - `Sliding`: evicts the oldest event and returns `true`.
    ///
    /// After shutdown, always returns `false`.
    pub async fn offer(&self, event: Event) -> bool {
        let mut event = Some(event);
        let space = self.space.notified();
        tokio::pin!(space);

        loop {
            space.as_mut().enable();
            {
                let mut st = self.lock();
                if st.closed {
                    return false;
                }
                if st.buf.len() < self.capacity {
                    if let Some(ev) = event.take() {
                        st.buf.push_back(ev);
                    }
                    drop(st);
                    self.items.notify_waiters();
                    return true;
                }
                match self.strategy {
                    QueueStrategy::Dropping => {
                        tracing::debug!(capacity = self.capacity, "queue full, event dropped");
                        return false;
                    }
                    QueueStrategy::Sliding => {
                        if let Some(evicted) = st.buf.pop_front() {
                            tracing::debug!(
                                evicted = evicted.id(),
                                capacity = self.capacity,
                                "queue full, oldest event evicted"
                            );
                        }
                        if let Some(ev) = event.take() {
                            st.buf.push_back(ev);
                        }
                        drop(st);
                        self.items.notify_waiters();
                        return true;
                    }
                    QueueStrategy::Bounded => {}
                }
            }
            space.as_mut().await;
            space.set(self.space.notified());
        }
    }

    /// Drains and returns everything currently queued. Never suspends.
    pub fn take_all(&self) -> Vec<Event> {
        self.take_up_to(usize::MAX)
    }

    /// Returns between `0` and `n` events in FIFO order. Never suspends.
    pub fn take_up_to(&self, n: usize) -> Vec<Event> {
        let taken = {
            let mut st = self.lock();
            let k = st.buf.len().min(n);
            st.buf.drain(..k).collect::<Vec<_>>()
        };
        if !taken.is_empty() {
            self.space.notify_waiters();
        }
        taken
    }

    /// Suspends until at least `min` events are queued, then returns up to `max`
    /// of them in FIFO order.
    ///
    /// Once the queue is shut down, returns immediately with whatever is left
    /// (possibly fewer than `min`, possibly none). `min` is clamped to `max`.
    pub async fn take_between(&self, min: usize, max: usize) -> Vec<Event> {
        let min = min.min(max);
        let items = self.items.notified();
        tokio::pin!(items);

        loop {
            items.as_mut().enable();
            {
                let mut st = self.lock();
                let len = st.buf.len();
                if len >= min || st.closed {
                    let taken: Vec<Event> = st.buf.drain(..len.min(max)).collect();
                    drop(st);
                    if !taken.is_empty() {
                        self.space.notify_waiters();
                    }
                    return taken;
                }
            }
            items.as_mut().await;
            items.set(self.items.notified());
        }
    }

    /// Current number of queued events (advisory; may change concurrently).
    pub fn size(&self) -> usize {
        self.lock().buf.len()
    }

    /// Closes the queue and wakes every suspended caller. Idempotent.
    pub fn shutdown(&self) {
        {
            let mut st = self.lock();
            if st.closed {
                return;
            }
            st.closed = true;
        }
        self.items.notify_waiters();
        self.space.notify_waiters();
    }

    /// True once [`shutdown`](Self::shutdown) has been called.
    pub fn is_shutdown(&self) -> bool {
        self.lock().closed
    }

    /// Queue state stays structurally valid across a panic, so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for EventQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventQueue")
            .field("capacity", &self.capacity)
            .field("strategy", &self.strategy)
            .field("size", &self.size())
            .finish()
    }
}
