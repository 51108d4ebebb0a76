//! HTTP mapping of `MtrrunError`. Bodies are bare text.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use mtrrun_core::error::{ErrorCode, MtrrunError};

#[derive(Debug)]
pub struct ApiError(pub MtrrunError);

impl From<MtrrunError> for ApiError {
    fn from(e: MtrrunError) -> Self {
        Self(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0.code() {
            ErrorCode::Validation => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::UnknownType => StatusCode::NOT_IMPLEMENTED,
            // The service layer should never let an insert collide.
            ErrorCode::AlreadyExists
            | ErrorCode::Transport
            | ErrorCode::Rejected
            | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = self.0.code().as_str(), error = %self.0, "request failed");
        } else {
            tracing::warn!(code = self.0.code().as_str(), error = %self.0, "request rejected");
        }
        (status, self.0.to_string()).into_response()
    }
}
