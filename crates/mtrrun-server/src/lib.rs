//! mtrrun collector server library entry.
//!
//! Layers, leaves first: `repository` (per-type in-memory stores), `service`
//! (upsert orchestration), `handler` (HTTP surface). `router` wires them into
//! an axum `Router` for the binary (`main.rs`) and for integration tests.

pub mod app_state;
pub mod config;
pub mod error;
pub mod handler;
pub mod model;
pub mod repository;
pub mod router;
pub mod service;
