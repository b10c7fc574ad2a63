use std::sync::Arc;

use axum::{
    extract::{multipart::Field, Path, State},
    http::StatusCode,
    Json,
};
use tracing::debug;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppMultipart, AppQuery};
use crate::features::complaints::dtos::{
    ComplaintResponseDto, CreateComplaintDto, CreateComplaintForm, ListComplaintsQuery,
    NearbyComplaintResponseDto, NearbyQueryParams, UpdateComplaintStatusDto,
};
use crate::features::complaints::services::ComplaintService;
use crate::features::uploads::dtos::{max_photo_size_mb, PhotoUpload};
use crate::shared::constants::{MAX_PHOTOS_PER_COMPLAINT, MAX_PHOTO_SIZE, PHOTOS_FIELD};
use crate::shared::types::ApiResponse;

/// Create a complaint
///
/// Accepts multipart/form-data with the text fields `title`, `description`,
/// `latitude`, `longitude`, `address`, `city` (all required) and up to five
/// image files in `photos`.
#[utoipa::path(
    post,
    path = "/api/complaints",
    tag = "complaints",
    request_body(
        content = CreateComplaintDto,
        content_type = "multipart/form-data",
        description = "Complaint form with optional photos",
    ),
    responses(
        (status = 201, description = "Complaint created", body = ApiResponse<ComplaintResponseDto>),
        (status = 400, description = "Missing or invalid field, or photo rejected"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_complaint(
    State(service): State<Arc<ComplaintService>>,
    AppMultipart(mut multipart): AppMultipart,
) -> Result<(StatusCode, Json<ApiResponse<ComplaintResponseDto>>)> {
    let mut form = CreateComplaintForm::default();
    let mut photos: Vec<PhotoUpload> = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e.body_text()))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        if field_name == PHOTOS_FIELD {
            if let Some(photo) = read_photo(field).await? {
                if photos.len() == MAX_PHOTOS_PER_COMPLAINT {
                    return Err(AppError::UploadRejected(format!(
                        "Too many photos. At most {} photos are allowed",
                        MAX_PHOTOS_PER_COMPLAINT
                    )));
                }
                photos.push(photo);
            }
            continue;
        }

        let text = field.text().await.map_err(|e| {
            AppError::BadRequest(format!("Failed to read field '{}': {}", field_name, e))
        })?;
        if !form.set_field(&field_name, text) {
            debug!("Ignoring unknown field: {}", field_name);
        }
    }

    let complaint = service.create(form, photos).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(complaint.into()), None, None)),
    ))
}

/// Read one photo part, refusing it as soon as it grows past the size limit.
///
/// A part with no filename and no content is what browsers send for an empty
/// file input; it is skipped.
async fn read_photo(mut field: Field<'_>) -> Result<Option<PhotoUpload>> {
    let file_name = field.file_name().unwrap_or_default().to_string();
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();

    let mut data: Vec<u8> = Vec::new();
    while let Some(chunk) = field.chunk().await.map_err(|e| {
        debug!("Failed to read photo bytes: {}", e);
        AppError::BadRequest(format!("Failed to read photo data: {}", e.body_text()))
    })? {
        if data.len() + chunk.len() > MAX_PHOTO_SIZE {
            return Err(AppError::UploadRejected(format!(
                "Photo '{}' is too large. Maximum size is {} MB",
                file_name,
                max_photo_size_mb()
            )));
        }
        data.extend_from_slice(&chunk);
    }

    if file_name.is_empty() && data.is_empty() {
        return Ok(None);
    }

    Ok(Some(PhotoUpload::new(file_name, content_type, data)))
}

/// List complaints, newest first
#[utoipa::path(
    get,
    path = "/api/complaints",
    tag = "complaints",
    params(ListComplaintsQuery),
    responses(
        (status = 200, description = "All complaints, newest first", body = ApiResponse<Vec<ComplaintResponseDto>>),
        (status = 400, description = "Invalid status filter"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_complaints(
    State(service): State<Arc<ComplaintService>>,
    AppQuery(query): AppQuery<ListComplaintsQuery>,
) -> Result<Json<ApiResponse<Vec<ComplaintResponseDto>>>> {
    let complaints = service.list(query.status()?).await?;
    let dtos: Vec<ComplaintResponseDto> = complaints.into_iter().map(|c| c.into()).collect();
    Ok(Json(ApiResponse::list(dtos)))
}

/// Get complaint by ID
#[utoipa::path(
    get,
    path = "/api/complaints/{id}",
    tag = "complaints",
    params(
        ("id" = Uuid, Path, description = "Complaint ID")
    ),
    responses(
        (status = 200, description = "Complaint found", body = ApiResponse<ComplaintResponseDto>),
        (status = 404, description = "Complaint not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_complaint(
    State(service): State<Arc<ComplaintService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ComplaintResponseDto>>> {
    let complaint = service.get_by_id(parse_complaint_id(&id)?).await?;
    Ok(Json(ApiResponse::success(Some(complaint.into()), None, None)))
}

/// Update complaint status
///
/// Any status may be set regardless of the current one.
#[utoipa::path(
    patch,
    path = "/api/complaints/{id}/status",
    tag = "complaints",
    params(
        ("id" = Uuid, Path, description = "Complaint ID")
    ),
    request_body = UpdateComplaintStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<ComplaintResponseDto>),
        (status = 400, description = "Invalid status"),
        (status = 404, description = "Complaint not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_complaint_status(
    State(service): State<Arc<ComplaintService>>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<UpdateComplaintStatusDto>,
) -> Result<Json<ApiResponse<ComplaintResponseDto>>> {
    let id = parse_complaint_id(&id)?;
    let complaint = service.update_status(id, &dto.status).await?;
    Ok(Json(ApiResponse::success(Some(complaint.into()), None, None)))
}

/// List complaints whose city contains the given text (case-insensitive)
#[utoipa::path(
    get,
    path = "/api/complaints/city/{city}",
    tag = "complaints",
    params(
        ("city" = String, Path, description = "City name or part of it")
    ),
    responses(
        (status = 200, description = "Matching complaints, newest first", body = ApiResponse<Vec<ComplaintResponseDto>>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_complaints_by_city(
    State(service): State<Arc<ComplaintService>>,
    Path(city): Path<String>,
) -> Result<Json<ApiResponse<Vec<ComplaintResponseDto>>>> {
    let complaints = service.list_by_city(&city).await?;
    let dtos: Vec<ComplaintResponseDto> = complaints.into_iter().map(|c| c.into()).collect();
    Ok(Json(ApiResponse::list(dtos)))
}

/// List complaints near a point, nearest first
#[utoipa::path(
    get,
    path = "/api/complaints/nearby",
    tag = "complaints",
    params(NearbyQueryParams),
    responses(
        (status = 200, description = "Complaints within maxDistance, nearest first", body = ApiResponse<Vec<NearbyComplaintResponseDto>>),
        (status = 400, description = "Missing or invalid coordinates"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_nearby_complaints(
    State(service): State<Arc<ComplaintService>>,
    AppQuery(params): AppQuery<NearbyQueryParams>,
) -> Result<Json<ApiResponse<Vec<NearbyComplaintResponseDto>>>> {
    let search = params.into_search()?;
    let complaints = service.list_nearby(&search).await?;
    let dtos: Vec<NearbyComplaintResponseDto> =
        complaints.into_iter().map(|c| c.into()).collect();
    Ok(Json(ApiResponse::list(dtos)))
}

/// A malformed id cannot name any complaint
fn parse_complaint_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(format!("Complaint {} not found", raw)))
}
