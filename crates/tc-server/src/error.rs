//! Error-to-HTTP response conversion.
//!
//! Implements `IntoResponse` for [`tc_core::Error`] so that route handlers
//! can return `Result<T, AppError>` and use `?` on core results directly.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Wrapper so we can implement `IntoResponse` for an external type.
pub struct AppError {
    inner: tc_core::Error,
}

impl AppError {
    pub fn new(inner: tc_core::Error) -> Self {
        Self { inner }
    }
}

impl From<tc_core::Error> for AppError {
    fn from(e: tc_core::Error) -> Self {
        Self::new(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.inner.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(
                status = %status,
                error = %self.inner,
                "Server error in API handler"
            );
        }

        let code = match &self.inner {
            tc_core::Error::NotFound { .. } => "not_found",
            tc_core::Error::Unauthorized(_) => "unauthorized",
            tc_core::Error::Validation(_) => "validation_error",
            tc_core::Error::Database { .. } => "database_error",
            tc_core::Error::Io { .. } => "io_error",
            tc_core::Error::Upstream { .. } => "upstream_error",
            tc_core::Error::Internal(_) => "internal_error",
        };

        let body = json!({
            "error": self.inner.to_string(),
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
