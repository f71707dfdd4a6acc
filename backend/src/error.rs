//! Application error handling
//!
//! This module provides unified error handling for the API,
//! converting internal errors to appropriate HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use metabolic_shared::types::{ErrorDetail, ErrorResponse};
use metabolic_shared::validation::FieldError;
use metabolic_shared::CalendarError;
use thiserror::Error;
use tracing::error;

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Bulk import where every row was skipped
    #[error("No valid entries found")]
    NoValidEntries(Vec<String>),

    /// Stored settings the calendar cannot work with
    #[error("Configuration error: {0}")]
    Configuration(#[from] CalendarError),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("Database error")]
    Database(#[from] sqlx::Error),
}

impl ApiError {
    /// Validation failure not tied to a single field
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            field: None,
        }
    }
}

impl From<FieldError> for ApiError {
    fn from(err: FieldError) -> Self {
        ApiError::Validation {
            message: err.message,
            field: Some(err.field),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut details = None;
        let (status, code, message, field) = match self {
            ApiError::Validation { message, field } => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message, field)
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg, None),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg, None),
            ApiError::NoValidEntries(errors) => {
                details = Some(serde_json::json!({ "errors": errors }));
                (
                    StatusCode::BAD_REQUEST,
                    "NO_VALID_ENTRIES",
                    "No valid entries found".to_string(),
                    None,
                )
            }
            ApiError::Configuration(err) => {
                error!(error = %err, "Calendar configuration error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONFIGURATION_ERROR",
                    err.to_string(),
                    None,
                )
            }
            ApiError::Internal(err) => {
                error!("Internal error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
            ApiError::Database(err) => {
                error!("Database error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                field,
                details,
            },
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_status() {
        let error = ApiError::validation("Invalid input");
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_field_error_keeps_field() {
        let error = ApiError::from(FieldError::new("weight", "Weight must be between 50 and 999 lbs"));
        match error {
            ApiError::Validation { field, .. } => assert_eq!(field.as_deref(), Some("weight")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_not_found_error_status() {
        let error = ApiError::NotFound("Weight entry not found".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_unauthorized_error_status() {
        let error = ApiError::Unauthorized("Missing X-User-Id header".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_no_valid_entries_is_bad_request() {
        let error = ApiError::NoValidEntries(vec!["Row 2: Missing date".to_string()]);
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_no_valid_entries_body_carries_row_errors() {
        let error = ApiError::NoValidEntries(vec!["Row 2: Missing date".to_string()]);
        let body = axum::body::to_bytes(error.into_response().into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: ErrorResponse = serde_json::from_slice(&body).unwrap();

        assert_eq!(parsed.error.code, "NO_VALID_ENTRIES");
        assert!(parsed.error.field.is_none());
        assert_eq!(
            parsed.error.details,
            Some(serde_json::json!({ "errors": ["Row 2: Missing date"] }))
        );
    }

    #[test]
    fn test_unknown_timezone_is_server_error() {
        let error = ApiError::from(CalendarError::UnknownTimezone("Mars/Base".to_string()));
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
