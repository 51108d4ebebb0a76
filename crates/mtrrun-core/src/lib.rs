//! mtrrun core: metric primitives, the in-process registry, the wire layout,
//! the error surface and the shutdown signal shared by the agent and the
//! collector server.
//!
//! This crate carries no HTTP stack so both binaries (and their tests) can
//! depend on it without pulling one in.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `MtrrunError`/`Result` so neither
//! process crashes on malformed input.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod metric;
pub mod protocol;
pub mod signal;
pub mod tracker;

/// Shared result type.
pub use error::{MtrrunError, Result};
pub use metric::{Counter, Description, Gauge, Metric, MetricKind};
pub use tracker::{Status, Tracker};
