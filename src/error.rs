//! Application error type and its HTTP mapping.
//!
//! Every fallible service operation returns [`AppError`]. Infrastructure
//! errors ([`crate::infrastructure::kv::StoreError`],
//! [`crate::infrastructure::http::FetchError`],
//! [`crate::infrastructure::transports::TransportError`]) convert into it.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use std::fmt;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error description embedded in responses and batch items.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug)]
pub enum AppError {
    /// Malformed input. Never retried.
    Validation { message: String, details: Value },
    /// The addressed feed or record does not exist.
    NotFound { message: String, details: Value },
    /// Optimistic update gave up after its retry budget.
    Conflict { message: String, details: Value },
    /// Network or HTTP failure talking to a remote site or API.
    Fetch { message: String, details: Value },
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }
    pub fn fetch(message: impl Into<String>, details: Value) -> Self {
        Self::Fetch {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Store update exhausted its attempts; `last_error` is the final failure.
    pub fn store_conflict_exhausted(attempts: usize, last_error: impl fmt::Display) -> Self {
        Self::conflict(
            "Store update did not converge",
            json!({ "attempts": attempts, "last_error": last_error.to_string() }),
        )
    }

    /// Stable code used in response bodies.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "validation_error",
            AppError::NotFound { .. } => "not_found",
            AppError::Conflict { .. } => "store_conflict_exhausted",
            AppError::Fetch { .. } => "fetch_error",
            AppError::Internal { .. } => "internal_error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::Validation { message, .. }
            | AppError::NotFound { message, .. }
            | AppError::Conflict { message, .. }
            | AppError::Fetch { message, .. }
            | AppError::Internal { message, .. } => message,
        }
    }

    fn details(&self) -> &Value {
        match self {
            AppError::Validation { details, .. }
            | AppError::NotFound { details, .. }
            | AppError::Conflict { details, .. }
            | AppError::Fetch { details, .. }
            | AppError::Internal { details, .. } => details,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Fetch { .. } => StatusCode::BAD_GATEWAY,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        ErrorInfo {
            code: self.code(),
            message: self.message().to_string(),
            details: self.details().clone(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let details = self.details();
        if details.as_object().is_some_and(|o| o.is_empty()) || details.is_null() {
            write!(f, "{}: {}", self.code(), self.message())
        } else {
            write!(f, "{}: {} ({})", self.code(), self.message(), details)
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::bad_request("Validation failed", json!(errors))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::internal("Stored document is not valid JSON", json!({ "reason": e.to_string() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::bad_request("x", json!({})).code(),
            "validation_error"
        );
        assert_eq!(AppError::not_found("x", json!({})).code(), "not_found");
        assert_eq!(
            AppError::store_conflict_exhausted(5, "boom").code(),
            "store_conflict_exhausted"
        );
        assert_eq!(AppError::fetch("x", json!({})).code(), "fetch_error");
    }

    #[test]
    fn test_store_conflict_details() {
        let err = AppError::store_conflict_exhausted(10, "write failed");
        let info = err.to_error_info();
        assert_eq!(info.details["attempts"], 10);
        assert_eq!(info.details["last_error"], "write failed");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::fetch("x", json!({})).into_response().status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::not_found("x", json!({})).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::store_conflict_exhausted(1, "e")
                .into_response()
                .status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_display_omits_empty_details() {
        let err = AppError::not_found("Feed not registered", json!({}));
        assert_eq!(err.to_string(), "not_found: Feed not registered");
    }
}
