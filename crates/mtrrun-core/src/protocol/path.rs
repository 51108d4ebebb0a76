//! Endpoint paths.
//!
//! Names and values are percent-encoded as single path segments, so a name
//! containing `/`, `?`, `#` or `%` still lands on its own route.

use crate::tracker::Status;
use crate::metric::MetricKind;

/// Upsert endpoint prefix: `POST /update/{kind}/{name}/{value}`.
pub const UPDATE_PREFIX: &str = "/update";
/// Read endpoint prefix: `GET /value/{kind}/{name}`.
pub const VALUE_PREFIX: &str = "/value";

pub fn update_path(kind: MetricKind, name: &str, value: &str) -> String {
    format!(
        "{UPDATE_PREFIX}/{kind}/{}/{}",
        urlencoding::encode(name),
        urlencoding::encode(value)
    )
}

pub fn value_path(kind: MetricKind, name: &str) -> String {
    format!("{VALUE_PREFIX}/{kind}/{}", urlencoding::encode(name))
}

/// Absolute push URL for one snapshot entry. `host` is `addr:port`.
pub fn update_url(host: &str, status: &Status) -> String {
    format!(
        "http://{}{}",
        host,
        update_path(status.kind, &status.name, &status.value)
    )
}
