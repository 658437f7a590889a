//! Authentication routes

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// Creates and returns the authentication router
///
/// # Routes
/// - `POST /api/auth/register` - Register with email/password
/// - `POST /api/auth/login` - Login with email/password
/// - `GET /api/profile` - Get current user information (authenticated)
/// - `GET /api/health` - Liveness check
pub fn auth_routes() -> Router {
    Router::new()
        .route("/api/auth/register", post(handlers::register))
        .route("/api/auth/login", post(handlers::login))
        .route("/api/profile", get(handlers::profile))
        .route("/api/health", get(handlers::health))
}
