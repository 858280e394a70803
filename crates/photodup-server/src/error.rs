//! API error handling.
//!
//! Every handler returns `Result<_, ApiError>`; the error renders as a JSON
//! body `{ "error": ..., "code": ... }` with a matching status code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use photodup_core::ScanError;
use serde_json::json;
use thiserror::Error;

/// API error type.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Internal server error - unexpected server-side failure
    #[error("Internal error: {0}")]
    Internal(String),

    /// Error from the scan engine
    #[error(transparent)]
    Scan(#[from] ScanError),
}

impl ApiError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Scan(ScanError::JobNotFound(_)) => StatusCode::NOT_FOUND,
            Self::Internal(_) | Self::Scan(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for programmatic error handling
    fn error_code(&self) -> &'static str {
        match self {
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Scan(e) => match e {
                ScanError::JobNotFound(_) => "JOB_NOT_FOUND",
                ScanError::Store(_) => "STORE_ERROR",
                ScanError::WorkerFailed(_) => "SCAN_FAILED",
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(status = %status, code = code, error = %message, "Server error");
        } else {
            tracing::warn!(status = %status, code = code, error = %message, "Client error");
        }

        (status, Json(json!({ "error": message, "code": code }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use photodup_core::{JobId, StoreError};

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::from(ScanError::JobNotFound(JobId::from("x"))).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(ScanError::WorkerFailed("boom".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(ScanError::Store(StoreError::NotFound("p".into()))).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(ApiError::internal("x").status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            ApiError::from(ScanError::JobNotFound(JobId::from("x"))).error_code(),
            "JOB_NOT_FOUND"
        );
        assert_eq!(ApiError::internal("x").error_code(), "INTERNAL_ERROR");
    }
}
