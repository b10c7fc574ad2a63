use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::complaints::models::{
    Complaint, ComplaintStatus, NearbyComplaint, NewComplaint,
};
use crate::shared::constants::DEFAULT_MAX_DISTANCE_METERS;
use crate::shared::geo::validate_coordinates;
use crate::shared::validation::{require_number, require_text};

/// Text fields of the create form as they arrive, before validation
#[derive(Debug, Clone, Default)]
pub struct CreateComplaintForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
}

impl CreateComplaintForm {
    /// Record a text field by its form name; returns false for unknown names
    pub fn set_field(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "title" => &mut self.title,
            "description" => &mut self.description,
            "latitude" => &mut self.latitude,
            "longitude" => &mut self.longitude,
            "address" => &mut self.address,
            "city" => &mut self.city,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    /// Check every required field and build the complaint data.
    ///
    /// Presence of all six fields is checked first, so a missing field is
    /// always reported as such even when another one is malformed.
    pub fn validate(self) -> Result<NewComplaint> {
        let title = require_text(self.title, "title")?;
        let description = require_text(self.description, "description")?;
        let latitude = require_text(self.latitude, "latitude")?;
        let longitude = require_text(self.longitude, "longitude")?;
        let address = require_text(self.address, "address")?;
        let city = require_text(self.city, "city")?;

        let latitude = require_number(Some(latitude), "latitude")?;
        let longitude = require_number(Some(longitude), "longitude")?;
        validate_coordinates(longitude, latitude)?;

        Ok(NewComplaint {
            title,
            description,
            longitude,
            latitude,
            address,
            city,
            photos: Vec::new(),
        })
    }
}

/// Create complaint request DTO for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct CreateComplaintDto {
    #[schema(example = "Pothole")]
    pub title: String,
    #[schema(example = "Large pothole on Main St")]
    pub description: String,
    #[schema(example = 12.9716)]
    pub latitude: f64,
    #[schema(example = 77.5946)]
    pub longitude: f64,
    #[schema(example = "Main St")]
    pub address: String,
    #[schema(example = "Bengaluru")]
    pub city: String,
    /// Up to 5 image files, 10 MB each
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub photos: Option<Vec<String>>,
}

/// GeoJSON-style point with the human-readable address attached
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LocationDto {
    /// Always "Point"
    #[serde(rename = "type")]
    #[schema(example = "Point")]
    pub kind: String,
    /// `[longitude, latitude]`
    pub coordinates: [f64; 2],
    pub address: String,
    pub city: String,
}

/// Response DTO for complaint
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintResponseDto {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub location: LocationDto,
    /// Stored photo names, served under `/uploads/`
    pub photos: Vec<String>,
    pub status: ComplaintStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Complaint> for ComplaintResponseDto {
    fn from(c: Complaint) -> Self {
        Self {
            id: c.id,
            title: c.title,
            description: c.description,
            location: LocationDto {
                kind: "Point".to_string(),
                coordinates: [c.longitude, c.latitude],
                address: c.address,
                city: c.city,
            },
            photos: c.photos,
            status: c.status,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Response DTO for a proximity search hit
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NearbyComplaintResponseDto {
    #[serde(flatten)]
    pub complaint: ComplaintResponseDto,
    /// Great-circle distance from the query point in meters
    pub distance_meters: f64,
}

impl From<NearbyComplaint> for NearbyComplaintResponseDto {
    fn from(n: NearbyComplaint) -> Self {
        Self {
            complaint: n.complaint.into(),
            distance_meters: n.distance_meters,
        }
    }
}

/// Request DTO for updating complaint status
///
/// `status` stays a plain string so unknown values surface as an invalid
/// status rather than a JSON decoding error.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateComplaintStatusDto {
    /// One of `pending`, `in_progress`, `resolved`
    #[schema(example = "resolved")]
    pub status: String,
}

/// Query parameters for listing complaints
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ListComplaintsQuery {
    /// Only return complaints with this status
    pub status: Option<String>,
}

impl ListComplaintsQuery {
    pub fn status(&self) -> Result<Option<ComplaintStatus>> {
        self.status.as_deref().map(str::parse).transpose()
    }
}

/// Query parameters for the nearby search
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
pub struct NearbyQueryParams {
    /// Longitude of the search center
    pub longitude: Option<f64>,
    /// Latitude of the search center
    pub latitude: Option<f64>,
    /// Search radius in meters (default: 5000)
    #[serde(rename = "maxDistance")]
    #[param(minimum = 0)]
    #[validate(range(min = 0.0, message = "maxDistance must not be negative"))]
    pub max_distance: Option<f64>,
}

/// A validated proximity search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbySearch {
    pub longitude: f64,
    pub latitude: f64,
    pub max_distance_meters: f64,
}

impl NearbyQueryParams {
    pub fn into_search(self) -> Result<NearbySearch> {
        let (Some(longitude), Some(latitude)) = (self.longitude, self.latitude) else {
            return Err(AppError::Validation(
                "longitude and latitude are required".to_string(),
            ));
        };

        self.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        validate_coordinates(longitude, latitude)?;

        let max_distance_meters = self.max_distance.unwrap_or(DEFAULT_MAX_DISTANCE_METERS);
        if !max_distance_meters.is_finite() {
            return Err(AppError::Validation(
                "maxDistance must be a finite number".to_string(),
            ));
        }

        Ok(NearbySearch {
            longitude,
            latitude,
            max_distance_meters,
        })
    }
}
