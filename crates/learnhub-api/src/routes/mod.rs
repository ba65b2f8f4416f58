//! API routes

mod auth;
mod health;
mod materials;
mod profile;
mod types;
mod users;

use axum::Router;

use crate::state::AppState;

// Re-export commonly used types for external use
#[allow(unused_imports)]
pub use auth::{RequireAdmin, RequireUser, ACCESS_COOKIE, REFRESH_COOKIE};
#[allow(unused_imports)]
pub use types::*;

/// Create the main router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(profile::routes())
        .merge(materials::routes())
        .merge(users::routes())
        .with_state(state)
}
