//! Authentication data models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// JWT claims structure
#[derive(Serialize, Deserialize, Debug)]
pub struct Claims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

/// User database model
///
/// The password hash never leaves this module boundary: it is skipped during
/// serialization so no handler can leak it by accident.
#[derive(FromRow, Serialize, Deserialize, Debug)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: Option<String>,
}

/// POST /api/auth/register and /api/auth/login request body
#[derive(Deserialize, Debug)]
pub struct CredentialsPayload {
    pub email: String,
    pub password: String,
}

/// POST /api/auth/register response
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: String,
    pub token: String,
    pub expires_in: i64,
}

/// POST /api/auth/login response
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user_id: String,
    pub expires_in: i64,
    pub user: PublicUser,
}

/// User identity as exposed to clients
#[derive(Serialize, Debug)]
pub struct PublicUser {
    pub id: String,
    pub email: String,
}
