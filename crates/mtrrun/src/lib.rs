//! Top-level facade crate for mtrrun.
//!
//! Re-exports the shared metric types, the agent and the collector server so
//! users can depend on a single crate.

pub mod core {
    pub use mtrrun_core::*;
}

pub mod agent {
    pub use mtrrun_agent::*;
}

pub mod server {
    pub use mtrrun_server::*;
}
