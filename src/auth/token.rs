//! Token issuing and verification
//!
//! Tokens are stateless HS256 JWTs carrying the owning user id. There is no
//! revocation list; a token stays valid until its expiry passes.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use super::models::Claims;

/// Token lifetime, fixed at issuance
pub const TOKEN_TTL_SECS: i64 = 3600;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Failed to sign token: {0}")]
    Signing(jsonwebtoken::errors::Error),

    #[error("Invalid or expired token")]
    Verification,
}

/// Issue a signed token for the given user id, expiring TOKEN_TTL_SECS from now
pub fn issue_token(user_id: &str, secret: &str) -> Result<String, TokenError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::seconds(TOKEN_TTL_SECS)).timestamp() as usize,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(TokenError::Signing)
}

/// Verify a token and return the user id it was issued for
///
/// Fails on bad signature, malformed payload, or expiry. The expiry boundary
/// is exact: a token is expired once `now >= exp`, with no clock-skew leeway.
pub fn verify_token(token: &str, secret: &str) -> Result<String, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|_| TokenError::Verification)?;

    // jsonwebtoken treats exp == now as still valid; the contract here is
    // that the exact boundary counts as expired
    if Utc::now().timestamp() as usize >= decoded.claims.exp {
        return Err(TokenError::Verification);
    }

    Ok(decoded.claims.sub)
}
