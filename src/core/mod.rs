//! Tracker core: orchestration and lifecycle.
//!
//! This module contains the pieces that tie the queue, middleware and
//! dispatcher together. The public API from this module is [`Tracker`],
//! its [`TrackerBuilder`] and [`TrackerConfig`].
//!
//! Internal modules:
//! - [`batcher`]: background loop racing the size trigger against the interval;
//! - [`builder`]: assembles a tracker and spawns its loop;
//! - [`config`]: tracker settings and defaults;
//! - [`tracker`]: public track/flush/shutdown surface and lifecycle state.

mod batcher;
mod builder;
mod config;
mod tracker;

pub use builder::TrackerBuilder;
pub use config::TrackerConfig;
pub use tracker::{IdGenerator, Tracker, TrackerState};
