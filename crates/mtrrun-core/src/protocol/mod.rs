//! Wire layout shared by the agent (which builds requests) and the server
//! (which parses them).
//!
//! - `path`: URL layout of the update/value endpoints.
//! - `value`: textual value encoding for each metric kind.
//!
//! All parsers are panic-free: malformed input is reported as
//! `MtrrunError::Validation` / `MtrrunError::UnknownType`.

pub mod path;
pub mod value;

/// Content type of every agent push and every server answer.
pub const CONTENT_TYPE_TEXT: &str = "text/plain";
