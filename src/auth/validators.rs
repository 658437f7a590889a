// src/auth/validators.rs

use super::models::CredentialsPayload;
use crate::common::validation::is_valid_email;
use crate::common::{ValidationResult, Validator};

const MIN_PASSWORD_LENGTH: usize = 6;

pub struct RegisterValidator;

impl Validator<CredentialsPayload> for RegisterValidator {
    fn validate(&self, data: &CredentialsPayload) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.email.trim().is_empty() {
            result.add_error("email", "Email is required");
        } else if !is_valid_email(&data.email) {
            result.add_error("email", "Email is invalid");
        }

        if data.password.is_empty() {
            result.add_error("password", "Password is required");
        } else if data.password.len() < MIN_PASSWORD_LENGTH {
            result.add_error("password", "Password must be at least 6 characters");
        }

        result
    }
}
