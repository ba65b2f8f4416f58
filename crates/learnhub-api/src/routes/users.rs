//! User management routes (admin only)

use axum::{
    extract::{Path, State},
    routing::{get, patch},
    Json, Router,
};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

use super::auth::RequireAdmin;
use super::types::{UpdateUserRequest, UserResponse};

/// GET /api/users (Admin only)
async fn list_users(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state.db.list_users().await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// PATCH /api/users/{id} (Admin only)
async fn update_user(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    // Verify user exists
    state
        .db
        .get_user_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User: {}", id)))?;

    if let Some(is_active) = request.is_active {
        state.db.set_user_active(id, is_active).await?;
    }
    if let Some(is_admin) = request.is_admin {
        state.db.set_user_admin(id, is_admin).await?;
    }

    let user = state
        .db
        .get_user_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User: {}", id)))?;

    info!("Updated user: {}", user.email);

    Ok(Json(user.into()))
}

/// Create user management routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/users", get(list_users))
        .route("/api/users/{id}", patch(update_user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_util::{body_json, get_with_bearer, post_json, test_app};
    use axum::http::StatusCode;
    use learnhub_auth::{role_of, scopes_of};
    use learnhub_db::User;

    async fn signup_user(
        app: &Router,
        state: &AppState,
        email: &str,
        make_admin: bool,
    ) -> (User, String) {
        post_json(
            app,
            "/api/auth/signup",
            serde_json::json!({
                "email": email,
                "password": "Aa1!aaaa",
                "password_confirm": "Aa1!aaaa"
            }),
        )
        .await;
        let user = state.db.get_user_by_email(email).await.unwrap().unwrap();
        if make_admin {
            state.db.set_user_admin(user.id, true).await.unwrap();
        }
        let user = state.db.get_user_by_id(user.id).await.unwrap().unwrap();
        let token = state
            .tokens
            .issue_access(user.id, &user.email, scopes_of(role_of(&user)))
            .unwrap();
        (user, token)
    }

    #[tokio::test]
    async fn test_list_users_requires_admin() {
        let (app, state) = test_app().await;

        let (_user, token) = signup_user(&app, &state, "plain@x.com", false).await;
        let response = get_with_bearer(&app, "/api/users", &token).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let (_admin, token) = signup_user(&app, &state, "admin@x.com", true).await;
        let response = get_with_bearer(&app, "/api/users", &token).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_user_flags() {
        let (app, state) = test_app().await;

        let (user, _) = signup_user(&app, &state, "target@x.com", false).await;
        let (_admin, token) = signup_user(&app, &state, "admin@x.com", true).await;

        let request = axum::http::Request::builder()
            .method("PATCH")
            .uri(format!("/api/users/{}", user.id))
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {}", token))
            .body(axum::body::Body::from(
                serde_json::to_vec(&serde_json::json!({"is_active": false})).unwrap(),
            ))
            .unwrap();
        let response = tower::ServiceExt::oneshot(app.clone(), request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["is_active"], false);

        let stored = state.db.get_user_by_id(user.id).await.unwrap().unwrap();
        assert!(!stored.is_active);
    }

    #[tokio::test]
    async fn test_update_unknown_user() {
        let (app, state) = test_app().await;

        let (_admin, token) = signup_user(&app, &state, "admin@x.com", true).await;

        let request = axum::http::Request::builder()
            .method("PATCH")
            .uri("/api/users/9999")
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {}", token))
            .body(axum::body::Body::from(
                serde_json::to_vec(&serde_json::json!({"is_active": false})).unwrap(),
            ))
            .unwrap();
        let response = tower::ServiceExt::oneshot(app.clone(), request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
