//! Authentication extractors for Axum

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::token::verify_token;
use crate::common::{ApiError, AppState};

/// Authenticated user extractor
///
/// Validates the bearer token from the `Authorization` header and resolves
/// the acting user id. A missing header and a failed verification are
/// reported separately, but both reject the request with 401. No database
/// lookup happens here; handlers that need the full user row load it
/// themselves.
#[derive(Debug)]
pub struct AuthedUser {
    pub id: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Extract the Extension containing the AppState
        let Extension(state_lock): Extension<Arc<RwLock<AppState>>> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::InternalServer("missing app state".to_string()))?;

        let app_state = state_lock.read().await.clone();

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let header = match header {
            Some(h) => h,
            None => {
                warn!("Authentication failed: missing Authorization header");
                return Err(ApiError::Unauthorized("Token not provided".to_string()));
            }
        };

        // "Bearer <token>" format: the token is the second whitespace-separated piece
        let bare_token = match header.split_whitespace().nth(1) {
            Some(t) => t,
            None => {
                warn!("Authentication failed: malformed Authorization header");
                return Err(ApiError::Unauthorized("Authentication failed".to_string()));
            }
        };

        match verify_token(bare_token, &app_state.jwt_secret) {
            Ok(user_id) => {
                debug!(user_id = %user_id, "Token verified successfully");
                Ok(AuthedUser { id: user_id })
            }
            Err(e) => {
                warn!(error = %e, "JWT token validation failed");
                Err(ApiError::Unauthorized("Authentication failed".to_string()))
            }
        }
    }
}
