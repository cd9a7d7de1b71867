//! Application error type and its HTTP rendering.
//!
//! Every failure surfaced by services and handlers is an [`AppError`]. Errors
//! are rendered as:
//!
//! ```json
//! { "error": { "code": "not_found", "message": "Short link not found", "details": { "slug": "abc" } } }
//! ```

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::domain::repositories::StoreError;
use crate::infrastructure::export::ExportStorageError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error description sent to clients.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed input; the caller must fix the request.
    #[error("{message}")]
    Validation { message: String, details: Value },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// The requested slug is already used by another link.
    #[error("Slug '{slug}' is already taken")]
    SlugTaken { slug: String },

    /// The link store failed; passed through from the repository untranslated.
    #[error(transparent)]
    StoreUnavailable(#[from] StoreError),

    #[error("{message}")]
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

    pub fn slug_taken(slug: impl Into<String>) -> Self {
        Self::SlugTaken { slug: slug.into() }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::SlugTaken { .. } => StatusCode::CONFLICT,
            Self::StoreUnavailable(_) | Self::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Builds the client-facing description. Server-side failures are reduced
    /// to a generic message.
    pub fn to_error_info(&self) -> ErrorInfo {
        match self {
            Self::Validation { message, details } => ErrorInfo {
                code: "validation_error",
                message: message.clone(),
                details: details.clone(),
            },
            Self::NotFound { message, details } => ErrorInfo {
                code: "not_found",
                message: message.clone(),
                details: details.clone(),
            },
            Self::SlugTaken { slug } => ErrorInfo {
                code: "slug_taken",
                message: self.to_string(),
                details: json!({ "slug": slug }),
            },
            Self::StoreUnavailable(_) | Self::Internal { .. } => ErrorInfo {
                code: "internal_error",
                message: "Internal server error".to_string(),
                details: json!({}),
            },
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(errors.field_errors()).unwrap_or_else(|_| json!({}));
        AppError::bad_request("Validation failed", details)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request("Invalid JSON body", json!({ "reason": rejection.body_text() }))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::bad_request(
            "Invalid query parameters",
            json!({ "reason": rejection.body_text() }),
        )
    }
}

impl From<ExportStorageError> for AppError {
    fn from(error: ExportStorageError) -> Self {
        AppError::internal("Export storage failure", json!({ "reason": error.to_string() }))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::bad_request("bad", json!({})).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::not_found("missing", json!({})).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::slug_taken("abc").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(StoreError::Unavailable("down".to_string())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_slug_taken_info() {
        let info = AppError::slug_taken("promo").to_error_info();
        assert_eq!(info.code, "slug_taken");
        assert_eq!(info.details["slug"], "promo");
        assert!(info.message.contains("promo"));
    }

    #[test]
    fn test_store_error_does_not_leak_detail() {
        let err = AppError::from(StoreError::Unavailable(
            "password authentication failed for user \"admin\"".to_string(),
        ));
        let info = err.to_error_info();

        assert_eq!(info.code, "internal_error");
        assert_eq!(info.message, "Internal server error");
        assert_eq!(info.details, json!({}));
    }

    #[test]
    fn test_validation_message_is_display() {
        let err = AppError::bad_request("Slug must not be empty", json!({}));
        assert_eq!(err.to_string(), "Slug must not be empty");
    }
}
