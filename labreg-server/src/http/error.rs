//! API error type with automatic HTTP status mapping.
//!
//! Handlers never match on driver messages themselves: write failures go
//! through [`ApiError::write`], which logs with operation context and runs
//! the shared classifier once. Every failure is logged before a response is
//! produced, and none is retried.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::classify::{classify_write_error, WriteRejection};
use crate::db::repos::DbError;
use crate::db::store::{QueryError, WriteError};

#[derive(Debug)]
pub enum ApiError {
    /// Requested entity absent (404).
    NotFound { resource: &'static str, id: String },

    /// Write rejected by the store's business-hours trigger (403).
    BusinessHours,

    /// Write failed for any other reason (500, raw message surfaced).
    WriteFailed { message: String },

    /// Read failed (500, generic body; detail stays in the log).
    Query(QueryError),
}

impl ApiError {
    /// Classify and log a failed write. `operation` and the offending
    /// identifier give the log line its context.
    pub fn write(operation: &'static str, chno: Option<i64>, err: WriteError) -> Self {
        match classify_write_error(err) {
            WriteRejection::TimeWindow => {
                tracing::warn!(operation, chno, "write rejected outside business hours");
                Self::BusinessHours
            }
            WriteRejection::Other(err) => {
                tracing::error!(
                    operation,
                    chno,
                    code = err.code.as_deref(),
                    "write failed: {}",
                    err.message
                );
                Self::WriteFailed {
                    message: err.message,
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::NotFound { resource, id } => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": "not_found",
                    "message": format!("{} '{}' not found", resource, id)
                }),
            ),
            Self::BusinessHours => (
                StatusCode::FORBIDDEN,
                json!({
                    "error": "business_hours",
                    "message": "writes are only permitted Monday to Friday between 08:00 and 18:00"
                }),
            ),
            Self::WriteFailed { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "error": "write_failed",
                    "message": message
                }),
            ),
            Self::Query(err) => {
                tracing::error!("read failed: {}", err.message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "internal_error",
                        "message": "an internal error occurred"
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            DbError::Query(q) => Self::Query(q),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn not_found_is_404() {
        let err = ApiError::NotFound {
            resource: "researcher",
            id: "12".into(),
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn business_hours_rejection_is_403() {
        let err = ApiError::write(
            "update",
            Some(3),
            WriteError::new("writes restricted to business hours", None),
        );
        assert!(matches!(err, ApiError::BusinessHours));
        assert_eq!(err.into_response().status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn other_write_failure_is_500_with_raw_message() {
        let err = ApiError::write(
            "delete",
            Some(3),
            WriteError::new("deadlock detected", Some("40P01".into())),
        );
        match &err {
            ApiError::WriteFailed { message } => assert_eq!(message, "deadlock detected"),
            other => panic!("expected WriteFailed, got {other:?}"),
        }
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
