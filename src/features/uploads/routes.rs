use axum::Router;
use tower_http::services::ServeDir;

use crate::modules::storage::LocalStorage;
use crate::shared::constants::UPLOADS_ROUTE;

/// Serve stored photos as static files under `/uploads/<name>`
pub fn routes(storage: &LocalStorage) -> Router {
    Router::new().nest_service(UPLOADS_ROUTE, ServeDir::new(storage.root()))
}
