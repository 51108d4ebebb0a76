use std::net::SocketAddr;

use serde::Deserialize;
use mtrrun_core::error::{MtrrunError, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen
            .parse()
            .map_err(|e| MtrrunError::Validation(format!("listen must be a valid SocketAddr: {e}")))
    }
}

fn default_listen() -> String {
    "127.0.0.1:8080".into()
}
