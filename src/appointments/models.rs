// src/appointments/models.rs
//! Appointment data models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Appointment database model
///
/// `appointment_date` is an absolute unix timestamp in seconds. `image_path`
/// holds the stored filename under the uploads directory, not a client-facing
/// URL; the URL is derived at read time.
#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct Appointment {
    pub id: String,
    pub user_id: String,
    pub pet_name: String,
    pub breed: String,
    pub appointment_date: i64,
    pub observations: Option<String>,
    pub image_path: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Appointment as returned to clients: the stored image path is rewritten
/// into a fetchable URL
#[derive(Serialize, Debug)]
pub struct AppointmentResponse {
    pub id: String,
    pub user_id: String,
    pub pet_name: String,
    pub breed: String,
    pub appointment_date: i64,
    pub observations: Option<String>,
    pub image_url: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<Appointment> for AppointmentResponse {
    fn from(appointment: Appointment) -> Self {
        let image_url = appointment
            .image_path
            .map(|path| format!("/api/uploads/{}", path));

        AppointmentResponse {
            id: appointment.id,
            user_id: appointment.user_id,
            pet_name: appointment.pet_name,
            breed: appointment.breed,
            appointment_date: appointment.appointment_date,
            observations: appointment.observations,
            image_url,
            created_at: appointment.created_at,
            updated_at: appointment.updated_at,
        }
    }
}

/// Raw multipart form fields for create/update, collected before validation
#[derive(Debug, Default)]
pub struct AppointmentForm {
    pub pet_name: Option<String>,
    pub breed: Option<String>,
    pub appointment_date: Option<String>,
    pub observations: Option<String>,
    pub image: Option<Vec<u8>>,
}

/// Validated mutable fields of an appointment
#[derive(Debug, Clone)]
pub struct AppointmentFields {
    pub pet_name: String,
    pub breed: String,
    pub appointment_date: i64,
    pub observations: Option<String>,
}

/// POST /api/pets response
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentResponse {
    pub message: String,
    pub pet_id: String,
}

/// Generic message response for update/delete
#[derive(Serialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}
