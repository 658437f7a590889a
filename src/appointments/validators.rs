// src/appointments/validators.rs

use chrono::DateTime;

use super::models::{AppointmentFields, AppointmentForm};
use crate::common::{ValidationResult, Validator};

const MAX_TEXT_LENGTH: usize = 255;
const MAX_OBSERVATIONS_LENGTH: usize = 2000;

pub struct AppointmentValidator;

impl Validator<AppointmentForm> for AppointmentValidator {
    fn validate(&self, data: &AppointmentForm) -> ValidationResult {
        let mut result = ValidationResult::new();

        match &data.pet_name {
            Some(name) if !name.trim().is_empty() => {
                if name.len() > MAX_TEXT_LENGTH {
                    result.add_error("pet_name", "Pet name must be less than 255 characters");
                }
            }
            _ => result.add_error("pet_name", "Pet name is required"),
        }

        match &data.breed {
            Some(breed) if !breed.trim().is_empty() => {
                if breed.len() > MAX_TEXT_LENGTH {
                    result.add_error("breed", "Breed must be less than 255 characters");
                }
            }
            _ => result.add_error("breed", "Breed is required"),
        }

        match &data.appointment_date {
            Some(raw) if !raw.trim().is_empty() => {
                if parse_appointment_date(raw).is_none() {
                    result.add_error(
                        "appointment_date",
                        "Appointment date must be an RFC 3339 datetime or unix seconds",
                    );
                }
            }
            _ => result.add_error("appointment_date", "Appointment date is required"),
        }

        if let Some(observations) = &data.observations {
            if observations.len() > MAX_OBSERVATIONS_LENGTH {
                result.add_error(
                    "observations",
                    "Observations must be less than 2000 characters",
                );
            }
        }

        result
    }
}

/// Parse a form-supplied date into an absolute unix timestamp in seconds.
/// Accepts integer seconds or an RFC 3339 datetime.
pub fn parse_appointment_date(raw: &str) -> Option<i64> {
    let raw = raw.trim();

    if let Ok(seconds) = raw.parse::<i64>() {
        return Some(seconds);
    }

    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.timestamp())
}

impl AppointmentForm {
    /// Convert a validated form into concrete fields. Callers must run
    /// AppointmentValidator first; this returns None if they didn't.
    pub fn into_fields(self) -> Option<AppointmentFields> {
        let appointment_date = parse_appointment_date(self.appointment_date.as_deref()?)?;

        Some(AppointmentFields {
            pet_name: self.pet_name?,
            breed: self.breed?,
            appointment_date,
            observations: self.observations,
        })
    }
}
