//! Error types for API responses

use crate::serializer::ValidationErrors;
use crate::store::StoreError;
use axum::{
    Json,
    http::{Method, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Drink not found")]
    NotFound,

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Method {method} not allowed")]
    MethodNotAllowed {
        method: Method,
        allow: &'static str,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND.into_response(),
            ApiError::Validation(errors) => (StatusCode::BAD_REQUEST, Json(errors)).into_response(),
            ApiError::MalformedBody(reason) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "detail": format!("JSON parse error - {reason}") })),
            )
                .into_response(),
            ApiError::MethodNotAllowed { method, allow } => (
                StatusCode::METHOD_NOT_ALLOWED,
                [(header::ALLOW, allow)],
                Json(json!({ "detail": format!("Method \"{method}\" not allowed.") })),
            )
                .into_response(),
            ApiError::Store(err) => {
                tracing::error!(error = %err, "Internal error");
                let body = Json(ErrorResponse {
                    error: "Internal server error".to_string(),
                    timestamp: chrono::Utc::now(),
                });
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    timestamp: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_has_no_body() {
        let response = ApiError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().get(header::CONTENT_TYPE).is_none());
    }

    #[test]
    fn test_method_not_allowed_sets_allow_header() {
        let response = ApiError::MethodNotAllowed {
            method: Method::PATCH,
            allow: "GET, POST",
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "GET, POST");
    }

    #[test]
    fn test_store_error_is_internal() {
        let err = ApiError::from(StoreError::Database(sqlx::Error::PoolClosed));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
