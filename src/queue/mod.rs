//! Event queue and its overflow strategies.
//!
//! ## Contents
//! - [`EventQueue`] bounded FIFO with blocking and non-blocking consumption
//! - [`QueueStrategy`] what happens when the queue is full (`Bounded` / `Dropping` / `Sliding`)

mod queue;
mod strategy;

pub use queue::EventQueue;
pub use strategy::QueueStrategy;
