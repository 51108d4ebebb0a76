//! Shared error type across mtrrun crates.

use thiserror::Error;

use crate::metric::MetricKind;

/// Stable error codes (logged by both sides, mapped to HTTP by the server).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Bad path or query parameters.
    Validation,
    /// Lookup miss.
    NotFound,
    /// Insert collision.
    AlreadyExists,
    /// Unsupported metric type string.
    UnknownType,
    /// Agent could not reach the collector.
    Transport,
    /// Collector answered with a failure status.
    Rejected,
    /// Unexpected store/render failure.
    Internal,
}

impl ErrorCode {
    /// String representation used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Validation => "VALIDATION",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::AlreadyExists => "ALREADY_EXISTS",
            ErrorCode::UnknownType => "UNKNOWN_TYPE",
            ErrorCode::Transport => "TRANSPORT",
            ErrorCode::Rejected => "REJECTED",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, MtrrunError>;

/// Unified error type used by core, agent and server.
#[derive(Debug, Error)]
pub enum MtrrunError {
    #[error("validation: {0}")]
    Validation(String),
    #[error("{kind} metric by name={name} not found")]
    NotFound { kind: MetricKind, name: String },
    #[error("{kind} metric by name={name} already exists")]
    AlreadyExists { kind: MetricKind, name: String },
    #[error("unknown metric type. Expected gauge or counter. Actual: {0}")]
    UnknownType(String),
    #[error("transport: {0}")]
    Transport(String),
    #[error("request ended with status {status} and error: {body}")]
    Rejected { status: u16, body: String },
    #[error("internal: {0}")]
    Internal(String),
}

impl MtrrunError {
    /// Map to a stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            MtrrunError::Validation(_) => ErrorCode::Validation,
            MtrrunError::NotFound { .. } => ErrorCode::NotFound,
            MtrrunError::AlreadyExists { .. } => ErrorCode::AlreadyExists,
            MtrrunError::UnknownType(_) => ErrorCode::UnknownType,
            MtrrunError::Transport(_) => ErrorCode::Transport,
            MtrrunError::Rejected { .. } => ErrorCode::Rejected,
            MtrrunError::Internal(_) => ErrorCode::Internal,
        }
    }

    pub fn not_found(kind: MetricKind, name: impl Into<String>) -> Self {
        MtrrunError::NotFound { kind, name: name.into() }
    }

    pub fn already_exists(kind: MetricKind, name: impl Into<String>) -> Self {
        MtrrunError::AlreadyExists { kind, name: name.into() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, MtrrunError::NotFound { .. })
    }
}
