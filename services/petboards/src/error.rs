//! Custom error types for the boards service

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::{error::DatabaseError, pagination::PaginationError};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::validation::ValidationError;

/// Custom error type for the boards service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed request, optionally naming the offending field
    #[error("Bad request: {message}")]
    BadRequest {
        field: Option<&'static str>,
        message: String,
    },

    /// Missing, malformed or expired token
    #[error("Unauthorized")]
    Unauthorized,

    /// Authenticated, but not the owner of the resource
    #[error("Forbidden")]
    Forbidden,

    /// Unknown resource or malformed identifier
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl ApiError {
    pub fn bad_request(field: Option<&'static str>, message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            field,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }
}

impl From<PaginationError> for ApiError {
    fn from(err: PaginationError) -> Self {
        ApiError::bad_request(Some(err.field()), err.to_string())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::bad_request(Some(err.field), err.message)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(None, rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message, field) = match self {
            ApiError::BadRequest { field, message } => (StatusCode::BAD_REQUEST, message, field),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string(), None),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden".to_string(), None),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message, None),
            ApiError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                None,
            ),
            ApiError::Database(e) => {
                error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let body = match field {
            Some(field) => json!({ "error": error_message, "field": field }),
            None => json!({ "error": error_message }),
        };

        (status, Json(body)).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::bad_request(None, "nope"), StatusCode::BAD_REQUEST),
            (ApiError::Unauthorized, StatusCode::UNAUTHORIZED),
            (ApiError::Forbidden, StatusCode::FORBIDDEN),
            (ApiError::not_found("Board not found"), StatusCode::NOT_FOUND),
            (
                ApiError::InternalServerError,
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApiError::Database(DatabaseError::Configuration("bad".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_pagination_error_names_field() {
        let err: ApiError = PaginationError::TooManyElements { max: 30 }.into();
        match err {
            ApiError::BadRequest { field, message } => {
                assert_eq!(field, Some("elements"));
                assert!(message.contains("30"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
