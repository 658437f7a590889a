//! Authentication handlers

use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::extractors::AuthedUser;
use super::models::{CredentialsPayload, LoginResponse, PublicUser, RegisterResponse, User};
use super::token::{issue_token, TOKEN_TTL_SECS};
use super::validators::RegisterValidator;
use crate::common::{generate_user_id, safe_email_log, ApiError, AppState, Validator};

/// POST /api/auth/register
///
/// Creates a user from email + password and issues a token right away, so a
/// freshly registered client does not need a separate login round trip.
pub async fn register(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(payload): Json<CredentialsPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    let validation_result = RegisterValidator.validate(&payload);
    if !validation_result.is_valid {
        warn!(
            email = %safe_email_log(&payload.email),
            errors = ?validation_result.errors,
            "Registration validation failed"
        );
        return Err(ApiError::from(validation_result));
    }

    // Duplicate email check
    let existing: Option<(String,)> = sqlx::query_as("SELECT id FROM users WHERE email = ?")
        .bind(&payload.email)
        .fetch_optional(&state.db)
        .await
        .map_err(|e| {
            error!(error = %e, "Database error during duplicate email check");
            ApiError::DatabaseError(e)
        })?;

    if existing.is_some() {
        warn!(
            email = %safe_email_log(&payload.email),
            "Registration rejected: email already registered"
        );
        return Err(ApiError::Conflict("Email already registered".to_string()));
    }

    let password_hash = bcrypt::hash(&payload.password, bcrypt::DEFAULT_COST).map_err(|e| {
        error!(error = %e, "Password hashing failed");
        ApiError::InternalServer("Failed to process password".to_string())
    })?;

    let user_id = generate_user_id();

    sqlx::query(
        r#"
        INSERT INTO users (id, email, password_hash, created_at)
        VALUES (?, ?, ?, datetime('now'))
        "#,
    )
    .bind(&user_id)
    .bind(&payload.email)
    .bind(&password_hash)
    .execute(&state.db)
    .await
    .map_err(|e| user_insert_error(e, &user_id))?;

    let token = issue_token(&user_id, &state.jwt_secret).map_err(|e| {
        error!(error = %e, user_id = %user_id, "Token issuance failed after registration");
        ApiError::InternalServer("Failed to issue token".to_string())
    })?;

    info!(
        user_id = %user_id,
        email = %safe_email_log(&payload.email),
        "User registered successfully"
    );

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User created successfully".to_string(),
            user_id,
            token,
            expires_in: TOKEN_TTL_SECS,
        }),
    ))
}

/// POST /api/auth/login
///
/// Unknown email and wrong password are deliberately indistinguishable: both
/// answer 401 "Invalid credentials".
pub async fn login(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(payload): Json<CredentialsPayload>,
) -> Result<Json<LoginResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(ApiError::ValidationError(
            "Email and password are required".to_string(),
        ));
    }

    let user: Option<User> = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(&payload.email)
        .fetch_optional(&state.db)
        .await
        .map_err(|e| {
            error!(error = %e, "Database error during login lookup");
            ApiError::DatabaseError(e)
        })?;

    let user = match user {
        Some(u) => u,
        None => {
            warn!(
                email = %safe_email_log(&payload.email),
                "Login failed: unknown email"
            );
            return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
        }
    };

    let password_valid = bcrypt::verify(&payload.password, &user.password_hash).map_err(|e| {
        error!(error = %e, user_id = %user.id, "Password verification failed");
        ApiError::InternalServer("Failed to verify password".to_string())
    })?;

    if !password_valid {
        warn!(user_id = %user.id, "Login failed: wrong password");
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = issue_token(&user.id, &state.jwt_secret).map_err(|e| {
        error!(error = %e, user_id = %user.id, "Token issuance failed during login");
        ApiError::InternalServer("Failed to issue token".to_string())
    })?;

    info!(
        user_id = %user.id,
        email = %safe_email_log(&user.email),
        "Login successful"
    );

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token,
        user_id: user.id.clone(),
        expires_in: TOKEN_TTL_SECS,
        user: PublicUser {
            id: user.id,
            email: user.email,
        },
    }))
}

/// GET /api/profile
///
/// Returns the authenticated user's profile, never including the password
/// hash. 404 if the user row behind a still-valid token has vanished.
pub async fn profile(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<User>, ApiError> {
    let state = state_lock.read().await.clone();

    let user: Option<User> = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(&authed.id)
        .fetch_optional(&state.db)
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %authed.id, "Database error fetching profile");
            ApiError::DatabaseError(e)
        })?;

    match user {
        Some(u) => Ok(Json(u)),
        None => {
            warn!(user_id = %authed.id, "Profile lookup failed: user not found");
            Err(ApiError::NotFound("User not found".to_string()))
        }
    }
}

/// Map a failed user INSERT to an API error
///
/// The duplicate-email pre-check is advisory only: two concurrent
/// registrations can both pass it, and the loser hits the UNIQUE constraint
/// here. That is still a conflict, not a server error.
pub(super) fn user_insert_error(e: sqlx::Error, user_id: &str) -> ApiError {
    let is_duplicate = e
        .as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false);

    if is_duplicate {
        warn!(user_id = %user_id, "Registration lost a duplicate-email race");
        ApiError::Conflict("Email already registered".to_string())
    } else {
        error!(error = %e, user_id = %user_id, "Database error creating user");
        ApiError::DatabaseError(e)
    }
}

/// GET /api/health - unauthenticated liveness check
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "OK",
        "message": "API is running"
    }))
}
