//! Authentication error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::token::TokenError;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Could not validate credentials")]
    Unauthenticated,

    #[error("Incorrect email or password")]
    InvalidCredentials,

    #[error("Insufficient permissions")]
    Forbidden,

    #[error("Inactive user")]
    UserInactive,

    #[error("User not found")]
    UserNotFound,

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Database error: {0}")]
    Db(#[from] learnhub_db::DbError),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AuthError::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, "Could not validate credentials")
            }
            AuthError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Incorrect email or password")
            }
            AuthError::Forbidden => (StatusCode::FORBIDDEN, "Insufficient permissions"),
            AuthError::UserInactive => (StatusCode::FORBIDDEN, "Inactive user"),
            AuthError::UserNotFound => (StatusCode::NOT_FOUND, "User not found"),
            AuthError::Token(_) => (StatusCode::UNAUTHORIZED, "Could not validate credentials"),
            AuthError::PasswordHash(_) | AuthError::Db(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
            }
        };

        let body = axum::Json(json!({
            "detail": message
        }));

        (status, body).into_response()
    }
}
