//! Tests for auth module
//!
//! These tests verify core authentication functionality including:
//! - Token issuing and verification
//! - Password hashing
//! - Registration input validation

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::common::migrations::run_migrations;
    use crate::common::{generate_user_id, ApiError, Validator};
    use chrono::Utc;
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
    use sqlx::sqlite::SqlitePoolOptions;

    const SECRET: &str = "test_secret_key";

    #[test]
    fn test_claims_structure() {
        let claims = models::Claims {
            sub: "U_TEST01".to_string(),
            iat: 1234567890,
            exp: 1234571490,
        };

        assert_eq!(claims.sub, "U_TEST01");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let token = token::issue_token("U_ABC123", SECRET).expect("Failed to issue token");
        let user_id = token::verify_token(&token, SECRET).expect("Failed to verify token");

        assert_eq!(user_id, "U_ABC123");
    }

    #[test]
    fn test_verify_fails_with_wrong_secret() {
        let token = token::issue_token("U_ABC123", SECRET).expect("Failed to issue token");
        let result = token::verify_token(&token, "wrong_secret_key");

        assert!(
            result.is_err(),
            "Token verification should fail with wrong secret"
        );
    }

    #[test]
    fn test_verify_fails_on_garbage_token() {
        assert!(token::verify_token("not-a-jwt", SECRET).is_err());
        assert!(token::verify_token("", SECRET).is_err());
    }

    #[test]
    fn test_verify_fails_at_exact_expiry() {
        // Hand-craft a token whose expiry is exactly now: the boundary
        // counts as expired
        let now = Utc::now().timestamp() as usize;
        let claims = models::Claims {
            sub: "U_ABC123".to_string(),
            iat: now - 3600,
            exp: now,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .expect("Failed to encode token");

        assert!(
            token::verify_token(&token, SECRET).is_err(),
            "Token at exact expiry boundary should be rejected"
        );
    }

    #[test]
    fn test_verify_fails_after_expiry() {
        let now = Utc::now().timestamp() as usize;
        let claims = models::Claims {
            sub: "U_ABC123".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .expect("Failed to encode token");

        assert!(token::verify_token(&token, SECRET).is_err());
    }

    #[test]
    fn test_password_hash_round_trip() {
        // Low cost keeps the test fast; production uses DEFAULT_COST
        let hash = bcrypt::hash("secret1", 4).expect("Failed to hash password");

        assert!(bcrypt::verify("secret1", &hash).unwrap());
        assert!(!bcrypt::verify("secret2", &hash).unwrap());
    }

    #[test]
    fn test_register_validator_accepts_valid_input() {
        let payload = models::CredentialsPayload {
            email: "alice@example.com".to_string(),
            password: "secret1".to_string(),
        };

        let result = validators::RegisterValidator.validate(&payload);
        assert!(result.is_valid);
        assert_eq!(result.errors.len(), 0);
    }

    #[test]
    fn test_register_validator_rejects_malformed_email() {
        let payload = models::CredentialsPayload {
            email: "not-an-email".to_string(),
            password: "secret1".to_string(),
        };

        let result = validators::RegisterValidator.validate(&payload);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.field == "email"));
    }

    #[test]
    fn test_register_validator_rejects_short_password() {
        let payload = models::CredentialsPayload {
            email: "alice@example.com".to_string(),
            password: "12345".to_string(),
        };

        let result = validators::RegisterValidator.validate(&payload);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.field == "password"));
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected_by_schema() {
        // Single connection: each pooled connection would otherwise get its
        // own private in-memory database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to open in-memory database");
        run_migrations(&pool).await.expect("Migrations failed");

        let insert = "INSERT INTO users (id, email, password_hash) VALUES (?, ?, ?)";

        sqlx::query(insert)
            .bind(generate_user_id())
            .bind("alice@example.com")
            .bind("hash-1")
            .execute(&pool)
            .await
            .expect("First insert should succeed");

        let second = sqlx::query(insert)
            .bind(generate_user_id())
            .bind("alice@example.com")
            .bind("hash-2")
            .execute(&pool)
            .await;

        let err = second.expect_err("Duplicate email should violate UNIQUE");

        // A lost insert race surfaces as a conflict, not a server error
        assert!(matches!(
            handlers::user_insert_error(err, "U_TEST01"),
            ApiError::Conflict(_)
        ));
    }
}
