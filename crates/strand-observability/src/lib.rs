//! # strand-observability
//!
//! Structured logging for the query engine: subscriber setup, span macros for the
//! hot paths (query, seed resolution, walk, DRIFT), and typed log events.

pub mod tracing_setup;

pub use tracing_setup::events;
pub use tracing_setup::{init_tracing, init_tracing_from_config, init_tracing_with_filter};
