// src/appointments/store.rs
//! Appointment persistence
//!
//! Plain row access over the shared pool. No ownership filtering happens
//! here beyond `list_by_owner`; ownership enforcement is the handlers' job.

use sqlx::SqlitePool;

use super::models::{Appointment, AppointmentFields};
use crate::common::generate_appointment_id;

#[derive(Debug, Clone)]
pub struct AppointmentStore {
    db: SqlitePool,
}

impl AppointmentStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Insert a new appointment for the given owner, returning the generated id
    pub async fn create(
        &self,
        owner_id: &str,
        fields: &AppointmentFields,
        image_path: Option<&str>,
    ) -> Result<String, sqlx::Error> {
        let appointment_id = generate_appointment_id();

        sqlx::query(
            r#"
            INSERT INTO appointments
                (id, user_id, pet_name, breed, appointment_date, observations, image_path, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, datetime('now'), datetime('now'))
            "#,
        )
        .bind(&appointment_id)
        .bind(owner_id)
        .bind(&fields.pet_name)
        .bind(&fields.breed)
        .bind(fields.appointment_date)
        .bind(fields.observations.as_deref())
        .bind(image_path)
        .execute(&self.db)
        .await?;

        Ok(appointment_id)
    }

    /// All appointments for an owner, ascending by appointment date.
    /// Returns an empty vec when there are none.
    pub async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Appointment>, sqlx::Error> {
        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE user_id = ? ORDER BY appointment_date ASC",
        )
        .bind(owner_id)
        .fetch_all(&self.db)
        .await
    }

    /// Single lookup by id, no ownership filter
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Appointment>, sqlx::Error> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.db)
            .await
    }

    /// Full replacement of the mutable fields, image path included
    pub async fn update(
        &self,
        id: &str,
        fields: &AppointmentFields,
        image_path: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE appointments
            SET pet_name = ?,
                breed = ?,
                appointment_date = ?,
                observations = ?,
                image_path = ?,
                updated_at = datetime('now')
            WHERE id = ?
            "#,
        )
        .bind(&fields.pet_name)
        .bind(&fields.breed)
        .bind(fields.appointment_date)
        .bind(fields.observations.as_deref())
        .bind(image_path)
        .bind(id)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    /// Delete by id. Deleting an absent row is a no-op success.
    pub async fn delete(&self, id: &str) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM appointments WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(())
    }
}
