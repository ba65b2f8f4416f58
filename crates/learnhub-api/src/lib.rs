//! Learnhub REST API
//!
//! This crate provides the Axum-based HTTP API for Learnhub:
//! authentication, profile, materials, and user management routes.

pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
