//! Request/Response DTOs

use serde::{Deserialize, Serialize};

use learnhub_db::User;

// ==================== Auth Types ====================

/// Signup request
#[derive(Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

/// Login form (OAuth2 password-flow field names)
#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Token response
#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Generic message response
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ==================== User Types ====================

/// User record response (never includes the password digest)
#[derive(Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub is_active: bool,
    pub is_admin: bool,
    pub created_at: String,
    pub last_login: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            is_active: user.is_active,
            is_admin: user.is_admin,
            created_at: user.created_at.to_rfc3339(),
            last_login: user.last_login.map(|dt| dt.to_rfc3339()),
        }
    }
}

/// Update user request (admin only)
#[derive(Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub is_admin: Option<bool>,
}

// ==================== Material Types ====================

/// A single material with its presigned URL
#[derive(Serialize)]
pub struct MaterialResponse {
    pub name: String,
    pub url: String,
    pub size: Option<i64>,
    pub uploaded_at: Option<String>,
}

/// Paginated material listing
#[derive(Serialize)]
pub struct MaterialListResponse {
    pub materials: Vec<MaterialResponse>,
    pub total: i64,
    pub page: i64,
    pub pages: i64,
}
