//! Tests for appointments module
//!
//! These tests verify the appointment field validation, the store contract
//! (ordering, idempotent delete, owner scoping) and the ownership pre-check
//! used by update/delete.

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::common::error::ApiError;
    use crate::common::migrations::run_migrations;
    use crate::common::{generate_user_id, Validator};
    use super::super::models::{AppointmentFields, AppointmentForm, AppointmentResponse};
    use super::super::validators::{parse_appointment_date, AppointmentValidator};
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::SqlitePool;

    // ========================================================================
    // Validator tests
    // ========================================================================

    fn valid_form() -> AppointmentForm {
        AppointmentForm {
            pet_name: Some("Rex".to_string()),
            breed: Some("Lab".to_string()),
            appointment_date: Some("2030-06-01T10:00:00Z".to_string()),
            observations: Some("First visit".to_string()),
            image: None,
        }
    }

    #[test]
    fn test_validator_accepts_valid_form() {
        let result = AppointmentValidator.validate(&valid_form());
        assert!(result.is_valid);
        assert_eq!(result.errors.len(), 0);
    }

    #[test]
    fn test_validator_rejects_missing_pet_name() {
        let mut form = valid_form();
        form.pet_name = Some("   ".to_string());

        let result = AppointmentValidator.validate(&form);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.field == "pet_name"));

        form.pet_name = None;
        let result = AppointmentValidator.validate(&form);
        assert!(!result.is_valid);
    }

    #[test]
    fn test_validator_rejects_missing_breed() {
        let mut form = valid_form();
        form.breed = None;

        let result = AppointmentValidator.validate(&form);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.field == "breed"));
    }

    #[test]
    fn test_validator_rejects_unparseable_date() {
        let mut form = valid_form();
        form.appointment_date = Some("next tuesday".to_string());

        let result = AppointmentValidator.validate(&form);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.field == "appointment_date"));
    }

    #[test]
    fn test_parse_appointment_date_formats() {
        assert_eq!(parse_appointment_date("1900000000"), Some(1900000000));
        assert_eq!(
            parse_appointment_date("1970-01-01T00:00:00Z"),
            Some(0)
        );
        assert_eq!(
            parse_appointment_date("2030-06-01T10:00:00+02:00"),
            parse_appointment_date("2030-06-01T08:00:00Z")
        );
        assert_eq!(parse_appointment_date(""), None);
        assert_eq!(parse_appointment_date("soon"), None);
    }

    #[test]
    fn test_form_into_fields() {
        let fields = valid_form().into_fields().expect("Form should convert");
        assert_eq!(fields.pet_name, "Rex");
        assert_eq!(fields.breed, "Lab");
        assert_eq!(fields.observations, Some("First visit".to_string()));
    }

    #[test]
    fn test_image_url_rewrite() {
        let appointment = models::Appointment {
            id: "A_TEST01".to_string(),
            user_id: "U_TEST01".to_string(),
            pet_name: "Rex".to_string(),
            breed: "Lab".to_string(),
            appointment_date: 1900000000,
            observations: None,
            image_path: Some("pet_K7NP3X2M.jpg".to_string()),
            created_at: None,
            updated_at: None,
        };

        let response = AppointmentResponse::from(appointment);
        assert_eq!(
            response.image_url,
            Some("/api/uploads/pet_K7NP3X2M.jpg".to_string())
        );

        let without_image = models::Appointment {
            image_path: None,
            id: "A_TEST02".to_string(),
            user_id: "U_TEST01".to_string(),
            pet_name: "Rex".to_string(),
            breed: "Lab".to_string(),
            appointment_date: 1900000000,
            observations: None,
            created_at: None,
            updated_at: None,
        };
        assert_eq!(AppointmentResponse::from(without_image).image_url, None);
    }

    // ========================================================================
    // Store tests (in-memory sqlite)
    // ========================================================================

    // Single connection: every pool connection would otherwise get its own
    // private in-memory database
    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to open in-memory database");
        run_migrations(&pool).await.expect("Migrations failed");
        pool
    }

    async fn insert_user(pool: &SqlitePool, email: &str) -> String {
        let user_id = generate_user_id();
        sqlx::query("INSERT INTO users (id, email, password_hash) VALUES (?, ?, ?)")
            .bind(&user_id)
            .bind(email)
            .bind("test-hash")
            .execute(pool)
            .await
            .expect("Failed to insert user");
        user_id
    }

    fn fields(pet_name: &str, date: i64) -> AppointmentFields {
        AppointmentFields {
            pet_name: pet_name.to_string(),
            breed: "Lab".to_string(),
            appointment_date: date,
            observations: None,
        }
    }

    #[tokio::test]
    async fn test_create_then_get_round_trip() {
        let pool = test_pool().await;
        let owner = insert_user(&pool, "owner@example.com").await;
        let store = AppointmentStore::new(pool);

        let input = AppointmentFields {
            pet_name: "Rex".to_string(),
            breed: "Lab".to_string(),
            appointment_date: 1900000000,
            observations: Some("First visit".to_string()),
        };
        let id = store
            .create(&owner, &input, None)
            .await
            .expect("Create failed");

        let fetched = store
            .get_by_id(&id)
            .await
            .expect("Lookup failed")
            .expect("Appointment should exist");

        assert_eq!(fetched.user_id, owner);
        assert_eq!(fetched.pet_name, "Rex");
        assert_eq!(fetched.breed, "Lab");
        assert_eq!(fetched.appointment_date, 1900000000);
        assert_eq!(fetched.observations, Some("First visit".to_string()));
        assert_eq!(fetched.image_path, None);
    }

    #[tokio::test]
    async fn test_list_is_ordered_and_scoped_to_owner() {
        let pool = test_pool().await;
        let alice = insert_user(&pool, "alice@example.com").await;
        let bob = insert_user(&pool, "bob@example.com").await;
        let store = AppointmentStore::new(pool.clone());

        store
            .create(&alice, &fields("Later", 2000000000), None)
            .await
            .unwrap();
        store
            .create(&alice, &fields("Sooner", 1900000000), None)
            .await
            .unwrap();
        store
            .create(&bob, &fields("Bobs", 1950000000), None)
            .await
            .unwrap();

        let listed = store.list_by_owner(&alice).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].pet_name, "Sooner");
        assert_eq!(listed[1].pet_name, "Later");
        assert!(listed.iter().all(|a| a.user_id == alice));

        // An owner with no appointments gets an empty vec, never an error
        let nobody = insert_user(&pool, "carol@example.com").await;
        let empty = store.list_by_owner(&nobody).await.unwrap();
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn test_update_replaces_all_fields() {
        let pool = test_pool().await;
        let owner = insert_user(&pool, "owner@example.com").await;
        let store = AppointmentStore::new(pool);

        let id = store
            .create(&owner, &fields("Rex", 1900000000), Some("pet_OLD.jpg"))
            .await
            .unwrap();

        let replacement = AppointmentFields {
            pet_name: "Max".to_string(),
            breed: "Poodle".to_string(),
            appointment_date: 1950000000,
            observations: Some("Renamed".to_string()),
        };
        store
            .update(&id, &replacement, Some("pet_NEW.jpg"))
            .await
            .unwrap();

        let fetched = store.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(fetched.pet_name, "Max");
        assert_eq!(fetched.breed, "Poodle");
        assert_eq!(fetched.appointment_date, 1950000000);
        assert_eq!(fetched.observations, Some("Renamed".to_string()));
        assert_eq!(fetched.image_path, Some("pet_NEW.jpg".to_string()));
        // Owner never changes on update
        assert_eq!(fetched.user_id, owner);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let pool = test_pool().await;
        let owner = insert_user(&pool, "owner@example.com").await;
        let store = AppointmentStore::new(pool);

        let id = store
            .create(&owner, &fields("Rex", 1900000000), None)
            .await
            .unwrap();

        store.delete(&id).await.expect("First delete failed");
        assert!(store.get_by_id(&id).await.unwrap().is_none());

        // Deleting an absent row is a no-op success
        store.delete(&id).await.expect("Second delete failed");
        store
            .delete("A_NEVER1")
            .await
            .expect("Deleting unknown id failed");
    }

    // ========================================================================
    // Ownership pre-check
    // ========================================================================

    #[tokio::test]
    async fn test_load_owned_rejects_other_users() {
        let pool = test_pool().await;
        let alice = insert_user(&pool, "alice@example.com").await;
        let bob = insert_user(&pool, "bob@example.com").await;
        let store = AppointmentStore::new(pool);

        let id = store
            .create(&alice, &fields("Rex", 1900000000), None)
            .await
            .unwrap();

        // Owner succeeds
        let owned = handlers::load_owned(&store, &id, &alice).await;
        assert!(owned.is_ok());

        // Another user gets the same 404 as a missing record
        let foreign = handlers::load_owned(&store, &id, &bob).await;
        assert!(matches!(foreign, Err(ApiError::NotFound(_))));

        let missing = handlers::load_owned(&store, "A_NEVER1", &alice).await;
        assert!(matches!(missing, Err(ApiError::NotFound(_))));
    }
}
