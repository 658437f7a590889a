// src/appointments/routes.rs

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, put},
    Router,
};

use super::handlers;

// Room for the multipart framing and text fields around a max-size image;
// axum's default 2MB body cap would otherwise reject valid uploads before
// the image field is ever read
const BODY_LIMIT: usize = handlers::MAX_IMAGE_SIZE + 1024 * 1024;

/// Creates and returns the appointments router
///
/// # Routes
/// - `GET /api/pets` - List the caller's appointments
/// - `POST /api/pets` - Create an appointment (multipart, optional image)
/// - `PUT /api/pets/:id` - Replace an owned appointment (multipart)
/// - `DELETE /api/pets/:id` - Delete an owned appointment
/// - `GET /api/uploads/:filename` - Serve stored appointment images
pub fn appointments_routes() -> Router {
    Router::new()
        .route(
            "/api/pets",
            get(handlers::list_appointments).post(handlers::create_appointment),
        )
        .route(
            "/api/pets/:id",
            put(handlers::update_appointment).delete(handlers::delete_appointment),
        )
        .route("/api/uploads/:filename", get(handlers::serve_upload))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_limit_covers_max_image() {
        // A maximum-size image plus form fields must fit under the body cap
        assert!(BODY_LIMIT > handlers::MAX_IMAGE_SIZE);
    }
}
