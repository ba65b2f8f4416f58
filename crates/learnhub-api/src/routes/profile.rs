//! Profile routes

use axum::{extract::State, routing::get, Json, Router};

use crate::error::ApiError;
use crate::state::AppState;

use super::auth::RequireUser;
use super::types::UserResponse;

/// GET /api/profile
///
/// The account state is re-read on every call so a deactivation after
/// token issuance takes effect immediately.
async fn get_profile(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.gate.require_active(&user).await?;
    Ok(Json(user.into()))
}

/// Create profile routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/profile", get(get_profile))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_util::{body_json, get_with_bearer, post_json, test_app};
    use axum::http::StatusCode;
    use learnhub_auth::{role_of, scopes_of};

    #[tokio::test]
    async fn test_profile_requires_token() {
        let (app, _state) = test_app().await;

        let request = axum::http::Request::builder()
            .method("GET")
            .uri("/api/profile")
            .body(axum::body::Body::empty())
            .unwrap();
        let response = tower::ServiceExt::oneshot(app.clone(), request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_profile_returns_current_user() {
        let (app, state) = test_app().await;

        post_json(
            &app,
            "/api/auth/signup",
            serde_json::json!({
                "email": "me@x.com",
                "password": "Aa1!aaaa",
                "password_confirm": "Aa1!aaaa"
            }),
        )
        .await;
        let user = state.db.get_user_by_email("me@x.com").await.unwrap().unwrap();
        let token = state
            .tokens
            .issue_access(user.id, &user.email, scopes_of(role_of(&user)))
            .unwrap();

        let response = get_with_bearer(&app, "/api/profile", &token).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["email"], "me@x.com");
        assert_eq!(body["id"], user.id);
        assert!(body.get("hashed_password").is_none());
    }

    #[tokio::test]
    async fn test_profile_rejects_deactivated_user() {
        let (app, state) = test_app().await;

        post_json(
            &app,
            "/api/auth/signup",
            serde_json::json!({
                "email": "me@x.com",
                "password": "Aa1!aaaa",
                "password_confirm": "Aa1!aaaa"
            }),
        )
        .await;
        let user = state.db.get_user_by_email("me@x.com").await.unwrap().unwrap();
        let token = state
            .tokens
            .issue_access(user.id, &user.email, scopes_of(role_of(&user)))
            .unwrap();

        // Deactivate while the token is still unexpired
        state.db.set_user_active(user.id, false).await.unwrap();

        let response = get_with_bearer(&app, "/api/profile", &token).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = body_json(response).await;
        assert_eq!(body["detail"], "Inactive user");
    }

    #[tokio::test]
    async fn test_profile_accepts_cookie_token() {
        let (app, state) = test_app().await;

        post_json(
            &app,
            "/api/auth/signup",
            serde_json::json!({
                "email": "me@x.com",
                "password": "Aa1!aaaa",
                "password_confirm": "Aa1!aaaa"
            }),
        )
        .await;
        let user = state.db.get_user_by_email("me@x.com").await.unwrap().unwrap();
        let token = state
            .tokens
            .issue_access(user.id, &user.email, scopes_of(role_of(&user)))
            .unwrap();

        let request = axum::http::Request::builder()
            .method("GET")
            .uri("/api/profile")
            .header("cookie", format!("access_token={}", token))
            .body(axum::body::Body::empty())
            .unwrap();
        let response = tower::ServiceExt::oneshot(app.clone(), request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
