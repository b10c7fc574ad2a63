//! Browser frontend: the map page and its assets
//!
//! Unknown GET paths fall back to `index.html` so client-side routes load the app.
//! Unknown paths under `/api/` stay JSON 404s.

use std::path::Path;

use axum::{http::Uri, routing::any, Router};
use tower_http::services::{ServeDir, ServeFile};

use crate::core::error::AppError;

pub fn routes(public_dir: &Path) -> Router {
    let index = ServeFile::new(public_dir.join("index.html"));
    Router::new()
        .route("/api/{*path}", any(api_not_found))
        .fallback_service(ServeDir::new(public_dir).fallback(index))
}

async fn api_not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No API route for {}", uri.path()))
}
