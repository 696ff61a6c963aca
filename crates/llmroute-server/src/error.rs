//! Application error types and Axum response conversion.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use llmroute_core::RouteError;
use serde::Serialize;
use tracing::{error, warn};

/// Application-level errors with HTTP status code mapping.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    BadGateway(String),
    Internal(String),
}

/// Error body; `detail` is the field existing callers read.
#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

impl From<RouteError> for AppError {
    fn from(err: RouteError) -> Self {
        let message = err.to_string();
        match err {
            RouteError::InvalidBackend { .. } => AppError::BadRequest(message),
            RouteError::TransportFailure(_) | RouteError::UpstreamError { .. } => {
                AppError::BadGateway(message)
            }
            RouteError::EmptyUpstreamReply => AppError::Internal(message),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        if status.is_server_error() {
            error!(status = %status.as_u16(), "{}", message);
        } else {
            warn!(status = %status.as_u16(), "{}", message);
        }

        (status, Json(ErrorResponse { detail: message })).into_response()
    }
}
