//! Custom error types for the gallery service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Custom error type for the gallery service
///
/// Each service failure maps to exactly one of these kinds; the HTTP layer
/// turns them into a status code and a JSON body with a readable message.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing or malformed input
    #[error("{0}")]
    Validation(String),

    /// Missing or invalid credential
    #[error("Unauthorized")]
    Unauthorized,

    /// Authenticated but not the resource owner
    #[error("Not authorized")]
    Forbidden,

    /// Resource absent
    #[error("{0}")]
    NotFound(String),

    /// Login attempts exhausted for this window
    #[error("Too many attempts, try again later")]
    TooManyRequests,

    /// Unexpected failure, including image relay errors
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "Unauthorized" }),
            ),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, json!({ "error": "Not authorized" })),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            ApiError::TooManyRequests => (
                StatusCode::TOO_MANY_REQUESTS,
                json!({ "error": "Too many attempts, try again later" }),
            ),
            ApiError::Internal(cause) => {
                error!("Unexpected failure: {:#}", cause);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error", "cause": cause.to_string() }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Type alias for gallery results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_map_to_their_status_codes() {
        let cases = [
            (
                ApiError::Validation("image required".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (ApiError::Unauthorized, StatusCode::UNAUTHORIZED),
            (ApiError::Forbidden, StatusCode::FORBIDDEN),
            (
                ApiError::NotFound("Artwork not found".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (ApiError::TooManyRequests, StatusCode::TOO_MANY_REQUESTS),
            (
                ApiError::Internal(anyhow::anyhow!("relay down")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn messages_are_human_readable() {
        assert_eq!(
            ApiError::Validation("image required".to_string()).to_string(),
            "image required"
        );
        assert_eq!(
            ApiError::NotFound("Artwork not found".to_string()).to_string(),
            "Artwork not found"
        );
        assert_eq!(ApiError::Forbidden.to_string(), "Not authorized");
    }
}
