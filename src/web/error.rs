//! HTTP error responses.
//!
//! Completion failures never reach this type: they are recorded in the transcript.
//! What remains are malformed requests and internal failures.

use crate::error::LogisError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

/// JSON error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code (e.g., "bad_request").
    pub error: String,
    /// Human-readable error message.
    pub message: String,
}

#[derive(Debug)]
pub enum WebError {
    /// 400 Bad Request - unknown lodging label or invalid form.
    BadRequest(String),
    /// 500 Internal Server Error - template or serialization failure.
    Internal(String),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            WebError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            WebError::Internal(msg) => {
                error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg)
            }
        };

        let body = ErrorBody {
            error: error_code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<LogisError> for WebError {
    fn from(err: LogisError) -> Self {
        match err {
            LogisError::UnknownLodging(_) => WebError::BadRequest(err.to_string()),
            _ => WebError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_lodging_is_bad_request() {
        let err: WebError = LogisError::UnknownLodging("9 - X".to_string()).into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_other_errors_are_internal() {
        let err: WebError = LogisError::ParseError("bad".to_string()).into();
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
