use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch},
    Router,
};

use crate::features::complaints::handlers;
use crate::features::complaints::services::ComplaintService;

/// Create routes for the complaints feature
///
/// `max_body_size` bounds the whole multipart body of a create request.
pub fn routes(complaint_service: Arc<ComplaintService>, max_body_size: usize) -> Router {
    Router::new()
        .route(
            "/api/complaints",
            get(handlers::list_complaints).post(handlers::create_complaint),
        )
        .route("/api/complaints/nearby", get(handlers::list_nearby_complaints))
        .route(
            "/api/complaints/city/{city}",
            get(handlers::list_complaints_by_city),
        )
        .route("/api/complaints/{id}", get(handlers::get_complaint))
        .route(
            "/api/complaints/{id}/status",
            patch(handlers::update_complaint_status),
        )
        .layer(DefaultBodyLimit::max(max_body_size))
        .with_state(complaint_service)
}
