//! Material listing routes

use axum::{extract::State, routing::get, Json, Router};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

use super::auth::RequireUser;
use super::types::{MaterialListResponse, MaterialResponse};

/// GET /api/materials
///
/// Lists PDF materials with presigned URLs. Pagination fields are part of
/// the contract but the listing is single-page.
async fn list_materials(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
) -> Result<Json<MaterialListResponse>, ApiError> {
    debug!("Listing materials for user: {}", user.email);

    let objects = state.store.list_objects().await?;

    let mut materials = Vec::new();
    for object in objects
        .into_iter()
        .filter(|o| o.name.to_lowercase().ends_with(".pdf"))
    {
        let url = state.store.presigned_url(&object.name, state.presign_ttl).await;
        materials.push(MaterialResponse {
            name: object.name,
            url,
            size: Some(object.size as i64),
            uploaded_at: object.uploaded_at.map(|dt| dt.to_rfc3339()),
        });
    }

    let total = materials.len() as i64;
    Ok(Json(MaterialListResponse {
        materials,
        total,
        page: 1,
        pages: 1,
    }))
}

/// Create material routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/materials", get(list_materials))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_util::{body_json, get_with_bearer, post_json, test_app};
    use axum::http::StatusCode;
    use learnhub_auth::{role_of, scopes_of};

    #[tokio::test]
    async fn test_materials_require_token() {
        let (app, _state) = test_app().await;

        let request = axum::http::Request::builder()
            .method("GET")
            .uri("/api/materials")
            .body(axum::body::Body::empty())
            .unwrap();
        let response = tower::ServiceExt::oneshot(app.clone(), request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_materials_unavailable_without_storage() {
        let (app, state) = test_app().await;

        post_json(
            &app,
            "/api/auth/signup",
            serde_json::json!({
                "email": "reader@x.com",
                "password": "Aa1!aaaa",
                "password_confirm": "Aa1!aaaa"
            }),
        )
        .await;
        let user = state.db.get_user_by_email("reader@x.com").await.unwrap().unwrap();
        let token = state
            .tokens
            .issue_access(user.id, &user.email, scopes_of(role_of(&user)))
            .unwrap();

        // The mock store has nothing to list
        let response = get_with_bearer(&app, "/api/materials", &token).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = body_json(response).await;
        assert!(body["detail"].as_str().is_some());
    }
}
