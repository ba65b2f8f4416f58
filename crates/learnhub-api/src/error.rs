//! API error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Auth error: {0}")]
    Auth(#[from] learnhub_auth::AuthError),

    #[error("Database error: {0}")]
    Database(#[from] learnhub_db::DbError),

    #[error("Storage error: {0}")]
    Storage(#[from] learnhub_storage::StorageError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            // AuthError carries its own status mapping
            ApiError::Auth(e) => return e.into_response(),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::Database(e) => match e {
                learnhub_db::DbError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
                learnhub_db::DbError::Duplicate(msg) => (StatusCode::BAD_REQUEST, msg),
                e => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            },
            ApiError::Storage(e) => match e {
                learnhub_storage::StorageError::Unavailable(_) => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Storage is not available. Cannot retrieve materials.".to_string(),
                ),
                e => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Error retrieving materials: {}", e),
                ),
            },
        };

        let body = axum::Json(json!({
            "detail": message
        }));

        (status, body).into_response()
    }
}
