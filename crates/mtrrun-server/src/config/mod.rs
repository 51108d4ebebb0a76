//! Server config loader (strict parsing).

pub mod schema;

use std::fs;

use mtrrun_core::error::{MtrrunError, Result};

pub use schema::ServerConfig;

pub fn load_from_file(path: &str) -> Result<ServerConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| MtrrunError::Internal(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ServerConfig> {
    let cfg: ServerConfig = serde_yaml::from_str(s)
        .map_err(|e| MtrrunError::Validation(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
