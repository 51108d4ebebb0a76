use std::time::Duration;

use serde::Deserialize;
use mtrrun_core::error::{MtrrunError, Result};

use crate::agent::Settings;

/// On-disk agent configuration.
///
/// Numeric fields are signed on purpose: zero or negative values are accepted
/// and fall back to the defaults once converted into [`Settings`].
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default)]
    pub timeout_secs: i64,

    #[serde(default)]
    pub max_idle_conns: i64,

    #[serde(default)]
    pub max_requests_per_moment: i64,

    #[serde(default)]
    pub report_interval_secs: i64,

    #[serde(default)]
    pub poll_interval_secs: i64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            timeout_secs: 0,
            max_idle_conns: 0,
            max_requests_per_moment: 0,
            report_interval_secs: 0,
            poll_interval_secs: 0,
        }
    }
}

impl AgentConfig {
    pub fn validate(&self) -> Result<()> {
        let host = self.host.trim();
        if host.is_empty() {
            return Err(MtrrunError::Validation("host must not be empty".into()));
        }
        if host.contains("://") || host.contains('/') {
            return Err(MtrrunError::Validation(
                "host must be addr:port without scheme or path".into(),
            ));
        }
        Ok(())
    }

    /// Agent settings; non-positive values become zero, which the agent
    /// replaces with its defaults.
    pub fn settings(&self) -> Settings {
        Settings {
            host: self.host.trim().to_string(),
            timeout: secs(self.timeout_secs),
            max_idle_conns: positive(self.max_idle_conns),
            max_requests_per_moment: positive(self.max_requests_per_moment),
            report_interval: secs(self.report_interval_secs),
            poll_interval: secs(self.poll_interval_secs),
        }
    }
}

fn positive(v: i64) -> usize {
    usize::try_from(v).unwrap_or(0)
}

fn secs(v: i64) -> Duration {
    Duration::from_secs(u64::try_from(v).unwrap_or(0))
}

fn default_host() -> String {
    "127.0.0.1:8080".into()
}
