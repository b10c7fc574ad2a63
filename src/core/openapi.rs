use utoipa::{Modify, OpenApi};

use crate::features::complaints::{dtos as complaints_dtos, handlers as complaints_handlers};
use crate::features::complaints::models::ComplaintStatus;
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        complaints_handlers::create_complaint,
        complaints_handlers::list_complaints,
        complaints_handlers::get_complaint,
        complaints_handlers::update_complaint_status,
        complaints_handlers::list_complaints_by_city,
        complaints_handlers::list_nearby_complaints,
    ),
    components(
        schemas(
            Meta,
            ComplaintStatus,
            complaints_dtos::CreateComplaintDto,
            complaints_dtos::LocationDto,
            complaints_dtos::ComplaintResponseDto,
            complaints_dtos::NearbyComplaintResponseDto,
            complaints_dtos::UpdateComplaintStatusDto,
            ApiResponse<complaints_dtos::ComplaintResponseDto>,
            ApiResponse<Vec<complaints_dtos::ComplaintResponseDto>>,
            ApiResponse<Vec<complaints_dtos::NearbyComplaintResponseDto>>,
        )
    ),
    tags(
        (name = "complaints", description = "Civic complaints with photos, status tracking and geo search"),
    ),
    info(
        title = "Civic Complaints API",
        version = "0.1.0",
        description = "API documentation for Civic Complaints",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
