//! API error types and responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Bad request - invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The storage layer failed, partially applied a batch, or returned a
    /// row that could not be decoded.
    #[error("storage error: {0}")]
    Storage(String),
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            Self::Storage(msg) => {
                tracing::error!(error = %msg, "Storage error");
                (StatusCode::BAD_GATEWAY, "storage_error", msg.clone())
            }
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<vendhub_store::StoreError> for ApiError {
    fn from(err: vendhub_store::StoreError) -> Self {
        match err {
            vendhub_store::StoreError::NotFound { machine_id } => {
                Self::NotFound(format!("machine not found: {machine_id}"))
            }
            vendhub_store::StoreError::InvalidArgument(msg) => Self::BadRequest(msg),
            vendhub_store::StoreError::Backend { .. }
            | vendhub_store::StoreError::Unprocessed { .. }
            | vendhub_store::StoreError::Corrupt(_) => Self::Storage(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vendhub_store::StoreError;

    #[test]
    fn corrupt_store_error_maps_to_bad_gateway() {
        let err = ApiError::from(StoreError::Corrupt("row missing Name".into()));
        assert!(matches!(err, ApiError::Storage(_)));
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn unprocessed_store_error_maps_to_bad_gateway() {
        let err = ApiError::from(StoreError::Unprocessed {
            operation: "delete_machine",
            count: 3,
        });
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}
