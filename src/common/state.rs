// Application state shared across all modules

use sqlx::SqlitePool;
use std::path::PathBuf;

/// Application state containing the database pool and configuration
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub uploads_dir: PathBuf,
    pub jwt_secret: String,
}
