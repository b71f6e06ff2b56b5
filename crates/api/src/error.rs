//! Error types for the seen-record API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use database::DatabaseError;
use thiserror::Error;

/// Errors that can occur while handling an API request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed record id in the request path.
    #[error("Invalid record ID")]
    InvalidId,

    /// Required `user_id` missing from the request body.
    #[error("user_id is required")]
    MissingUserId,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::InvalidId | ApiError::MissingUserId => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            ApiError::Database(err @ DatabaseError::NotFound { .. }) => {
                (StatusCode::NOT_FOUND, err.to_string())
            }
            ApiError::Database(err) => {
                tracing::error!("Database error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_bad_request() {
        assert_eq!(
            ApiError::InvalidId.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::MissingUserId.into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_missing_record_is_not_found() {
        let err = ApiError::Database(DatabaseError::NotFound {
            entity: "Seen record",
            id: "abc".to_string(),
        });
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
