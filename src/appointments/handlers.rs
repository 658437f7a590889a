// src/appointments/handlers.rs
//! Appointment resource handlers
//!
//! Every handler runs behind the AuthedUser extractor and never trusts a
//! caller-supplied owner id. Ownership failures are reported as 404, exactly
//! like a missing record, so callers can't probe for other users' data.

use axum::{
    extract::{Extension, Multipart, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use infer::Infer;
use std::sync::Arc;
use tokio::fs as tokio_fs;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use super::models::{
    Appointment, AppointmentForm, AppointmentResponse, CreateAppointmentResponse, MessageResponse,
};
use super::store::AppointmentStore;
use super::validators::AppointmentValidator;
use crate::auth::AuthedUser;
use crate::common::{generate_raw_id, ApiError, AppState, Validator};

// File size limit for uploaded images: 5MB
pub(super) const MAX_IMAGE_SIZE: usize = 5 * 1024 * 1024;

/// POST /api/pets - Create an appointment (multipart form, optional image)
pub async fn create_appointment(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    let mut form = collect_form(multipart).await?;

    let validation_result = AppointmentValidator.validate(&form);
    if !validation_result.is_valid {
        warn!(
            user_id = %authed.id,
            errors = ?validation_result.errors,
            "Appointment creation validation failed"
        );
        return Err(ApiError::from(validation_result));
    }

    let image = form.image.take();
    let fields = form
        .into_fields()
        .ok_or_else(|| ApiError::ValidationError("Invalid appointment fields".to_string()))?;

    let image_path = match image {
        Some(data) => Some(save_image_file(&state, &data).await?),
        None => None,
    };

    let store = AppointmentStore::new(state.db.clone());
    let appointment_id = store
        .create(&authed.id, &fields, image_path.as_deref())
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %authed.id, "Database error creating appointment");
            ApiError::DatabaseError(e)
        })?;

    info!(
        user_id = %authed.id,
        appointment_id = %appointment_id,
        pet_name = %fields.pet_name,
        "Appointment created successfully"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateAppointmentResponse {
            message: "Appointment created successfully".to_string(),
            pet_id: appointment_id,
        }),
    ))
}

/// GET /api/pets - List the caller's appointments, ascending by date
pub async fn list_appointments(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<Vec<AppointmentResponse>>, ApiError> {
    let state = state_lock.read().await.clone();

    let store = AppointmentStore::new(state.db.clone());
    let appointments = store.list_by_owner(&authed.id).await.map_err(|e| {
        error!(error = %e, user_id = %authed.id, "Database error listing appointments");
        ApiError::DatabaseError(e)
    })?;

    debug!(
        user_id = %authed.id,
        appointment_count = appointments.len(),
        "Fetched appointments"
    );

    Ok(Json(
        appointments
            .into_iter()
            .map(AppointmentResponse::from)
            .collect(),
    ))
}

/// PUT /api/pets/:id - Full-field replacement of an owned appointment
pub async fn update_appointment(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(appointment_id): Path<String>,
    multipart: Multipart,
) -> Result<Json<MessageResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let mut form = collect_form(multipart).await?;

    let validation_result = AppointmentValidator.validate(&form);
    if !validation_result.is_valid {
        warn!(
            user_id = %authed.id,
            appointment_id = %appointment_id,
            errors = ?validation_result.errors,
            "Appointment update validation failed"
        );
        return Err(ApiError::from(validation_result));
    }

    let store = AppointmentStore::new(state.db.clone());
    let existing = load_owned(&store, &appointment_id, &authed.id).await?;

    let image = form.image.take();
    let fields = form
        .into_fields()
        .ok_or_else(|| ApiError::ValidationError("Invalid appointment fields".to_string()))?;

    // A freshly uploaded image replaces the stored one; otherwise the
    // existing reference is preserved
    let image_path = match image {
        Some(data) => Some(save_image_file(&state, &data).await?),
        None => existing.image_path.clone(),
    };

    store
        .update(&appointment_id, &fields, image_path.as_deref())
        .await
        .map_err(|e| {
            error!(
                error = %e,
                user_id = %authed.id,
                appointment_id = %appointment_id,
                "Database error updating appointment"
            );
            ApiError::DatabaseError(e)
        })?;

    info!(
        user_id = %authed.id,
        appointment_id = %appointment_id,
        "Appointment updated successfully"
    );

    Ok(Json(MessageResponse {
        message: "Appointment updated successfully".to_string(),
    }))
}

/// DELETE /api/pets/:id - Delete an owned appointment
pub async fn delete_appointment(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(appointment_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let store = AppointmentStore::new(state.db.clone());
    let existing = load_owned(&store, &appointment_id, &authed.id).await?;

    store.delete(&appointment_id).await.map_err(|e| {
        error!(
            error = %e,
            user_id = %authed.id,
            appointment_id = %appointment_id,
            "Database error deleting appointment"
        );
        ApiError::DatabaseError(e)
    })?;

    // Best-effort cleanup of the stored image file
    if let Some(image_path) = &existing.image_path {
        let file_path = state.uploads_dir.join(sanitize_filename(image_path));
        let _ = tokio_fs::remove_file(&file_path).await;
    }

    info!(
        user_id = %authed.id,
        appointment_id = %appointment_id,
        "Appointment deleted successfully"
    );

    Ok(Json(MessageResponse {
        message: "Appointment deleted successfully".to_string(),
    }))
}

/// GET /api/uploads/:filename - Serve stored appointment images
pub async fn serve_upload(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    // Sanitize filename to prevent path traversal
    let safe_filename = sanitize_filename(&filename);
    let file_path = state.uploads_dir.join(&safe_filename);

    if !file_path.exists() {
        return Err(ApiError::NotFound("Image not found".to_string()));
    }

    let file_content = tokio_fs::read(&file_path)
        .await
        .map_err(|_| ApiError::InternalServer("Failed to read image file".to_string()))?;

    let content_type = get_content_type_from_extension(&safe_filename);

    Ok((
        StatusCode::OK,
        [
            ("Content-Type", content_type),
            ("Cache-Control", "public, max-age=31536000"),
        ],
        file_content,
    ))
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Load an appointment that must belong to `owner_id`. Absent and not-owned
/// are deliberately the same 404.
pub(super) async fn load_owned(
    store: &AppointmentStore,
    appointment_id: &str,
    owner_id: &str,
) -> Result<Appointment, ApiError> {
    let appointment = store.get_by_id(appointment_id).await.map_err(|e| {
        error!(
            error = %e,
            appointment_id = %appointment_id,
            "Database error during ownership check"
        );
        ApiError::DatabaseError(e)
    })?;

    match appointment {
        Some(a) if a.user_id == owner_id => Ok(a),
        _ => {
            warn!(
                user_id = %owner_id,
                appointment_id = %appointment_id,
                "Appointment not found or not owned by caller"
            );
            Err(ApiError::NotFound("Appointment not found".to_string()))
        }
    }
}

/// Gather the multipart form fields into an AppointmentForm
async fn collect_form(mut multipart: Multipart) -> Result<AppointmentForm, ApiError> {
    let mut form = AppointmentForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::BadRequest("Invalid multipart form".to_string()))?
    {
        match field.name() {
            Some("pet_name") => form.pet_name = Some(read_text(field).await?),
            Some("breed") => form.breed = Some(read_text(field).await?),
            Some("appointment_date") => form.appointment_date = Some(read_text(field).await?),
            Some("observations") => form.observations = Some(read_text(field).await?),
            Some("image") => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|_| ApiError::BadRequest("Failed to read image data".to_string()))?
                    .to_vec();
                // An empty file part means no image was attached
                if !data.is_empty() {
                    form.image = Some(data);
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|_| ApiError::BadRequest("Invalid form field".to_string()))
}

/// Validate and persist an uploaded image, returning the stored filename
async fn save_image_file(state: &AppState, data: &[u8]) -> Result<String, ApiError> {
    if data.len() > MAX_IMAGE_SIZE {
        return Err(ApiError::BadRequest(
            "File size exceeds 5MB limit".to_string(),
        ));
    }

    let extension = match image_extension(data) {
        Some(ext) => ext,
        None => {
            return Err(ApiError::BadRequest(
                "Invalid image type. Only JPEG, PNG, GIF, and WebP are supported".to_string(),
            ))
        }
    };

    let filename = format!("pet_{}.{}", generate_raw_id(8), extension);
    let file_path = state.uploads_dir.join(&filename);

    tokio_fs::write(&file_path, data).await.map_err(|e| {
        error!(error = %e, file_path = %file_path.display(), "Failed to save image file");
        ApiError::InternalServer("Failed to save image file".to_string())
    })?;

    info!(filename = %filename, "Image file saved successfully");

    Ok(filename)
}

/// Sniff the image type from magic bytes; None for anything unsupported
fn image_extension(data: &[u8]) -> Option<&'static str> {
    let infer = Infer::new();
    match infer.get(data)?.mime_type() {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

fn get_content_type_from_extension(filename: &str) -> &'static str {
    match filename.split('.').last() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "image/jpeg",
    }
}

fn sanitize_filename(filename: &str) -> String {
    // Remove path traversal sequences and directory separators
    let cleaned = filename
        .replace("..", "")
        .replace('/', "")
        .replace('\\', "")
        .replace('\0', "");

    // Whitelist safe characters: alphanumeric, dots, hyphens, underscores
    let sanitized: String = cleaned
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '.' || *c == '-' || *c == '_')
        .collect();

    if sanitized.is_empty() {
        "sanitized_file".to_string()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod helper_tests {
    use super::*;

    #[test]
    fn test_sanitize_filename_strips_traversal() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "etcpasswd");
        assert_eq!(sanitize_filename("pet_ABC123.jpg"), "pet_ABC123.jpg");
        assert_eq!(sanitize_filename("///"), "sanitized_file");
    }

    #[test]
    fn test_image_extension_sniffs_magic_bytes() {
        let png_header = [0x89u8, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
        assert_eq!(image_extension(&png_header), Some("png"));

        let jpeg_header = [0xFFu8, 0xD8, 0xFF, 0xE0, 0, 0, 0, 0];
        assert_eq!(image_extension(&jpeg_header), Some("jpg"));

        assert_eq!(image_extension(b"definitely not an image"), None);
    }

    #[test]
    fn test_content_type_from_extension() {
        assert_eq!(get_content_type_from_extension("a.png"), "image/png");
        assert_eq!(get_content_type_from_extension("a.webp"), "image/webp");
        assert_eq!(get_content_type_from_extension("noext"), "image/jpeg");
    }

    #[tokio::test]
    async fn test_save_image_file_rejects_oversized_upload() {
        let state = AppState {
            db: sqlx::SqlitePool::connect_lazy("sqlite::memory:")
                .expect("Failed to create lazy pool"),
            uploads_dir: std::env::temp_dir(),
            jwt_secret: "test_secret_key".to_string(),
        };

        let data = vec![0u8; MAX_IMAGE_SIZE + 1];
        let result = save_image_file(&state, &data).await;

        assert!(
            matches!(result, Err(ApiError::BadRequest(_))),
            "Oversized image should be rejected before touching disk"
        );
    }
}
