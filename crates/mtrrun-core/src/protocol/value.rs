//! Value encoding on the wire and on the read endpoints.
//!
//! Gauges parse as `f64` and render with the shortest representation that
//! round-trips (`3.5`, `3`); counters parse and render as plain `i64`.

use crate::error::{MtrrunError, Result};

pub fn parse_gauge(raw: &str) -> Result<f64> {
    raw.parse::<f64>().map_err(|_| {
        MtrrunError::Validation(format!(
            "unable to parse value. Expected: float. Actual: {raw}"
        ))
    })
}

pub fn parse_counter(raw: &str) -> Result<i64> {
    raw.parse::<i64>().map_err(|_| {
        MtrrunError::Validation(format!(
            "unable to parse value. Expected: int. Actual: {raw}"
        ))
    })
}

pub fn format_gauge(v: f64) -> String {
    v.to_string()
}

pub fn format_counter(v: i64) -> String {
    v.to_string()
}
