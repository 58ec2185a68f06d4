//! Middleware chain applied to each event before it reaches the queue.
//!
//! - [`Middleware`] a single transform-or-drop unit, plus the built-ins
//!   (`filter`, `add_metadata`, `add_metadata_from`, `map_name`, `map_payload`,
//!   `map`, `tap`, `identity`) and [`Middleware::compose`].

mod middleware;

pub use middleware::Middleware;
