//! mtrrun agent library entry.
//!
//! The agent owns a [`mtrrun_core::Tracker`], refreshes the tracked metrics on
//! a poll interval and pushes a snapshot of them to the collector on a report
//! interval. It is consumed by the binary (`main.rs`) and by integration tests.

pub mod agent;
pub mod client;
pub mod collect;
pub mod config;

pub use agent::{stopped, Agent, AgentState, ReportOutcome, Settings};
pub use client::{HttpClient, Transport};
pub use collect::Poller;
