use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::complaints::dtos::{CreateComplaintForm, NearbySearch};
use crate::features::complaints::models::{Complaint, ComplaintStatus, NearbyComplaint};
use crate::features::complaints::repositories::ComplaintRepository;
use crate::features::uploads::dtos::PhotoUpload;
use crate::features::uploads::UploadService;

/// Service for complaint operations
///
/// All input is validated here before the repository is touched.
pub struct ComplaintService {
    repository: Arc<dyn ComplaintRepository>,
    uploads: Arc<UploadService>,
}

impl ComplaintService {
    pub fn new(repository: Arc<dyn ComplaintRepository>, uploads: Arc<UploadService>) -> Self {
        Self {
            repository,
            uploads,
        }
    }

    /// Create a complaint with its photos
    ///
    /// Form fields and photos are both validated before anything is written.
    /// If the insert fails, the photos written for it are removed again.
    pub async fn create(
        &self,
        form: CreateComplaintForm,
        photos: Vec<PhotoUpload>,
    ) -> Result<Complaint> {
        let mut data = form.validate()?;
        UploadService::validate_batch(&photos)?;

        data.photos = self.uploads.store_batch(photos).await?;

        match self.repository.create(&data).await {
            Ok(complaint) => {
                info!(
                    "Created complaint: {} in {} with {} photo(s)",
                    complaint.id,
                    complaint.city,
                    complaint.photos.len()
                );
                Ok(complaint)
            }
            Err(e) => {
                warn!(
                    "Complaint insert failed, discarding {} photo(s)",
                    data.photos.len()
                );
                self.uploads.discard(&data.photos).await;
                Err(e)
            }
        }
    }

    /// List all complaints newest first, optionally only those with `status`
    pub async fn list(&self, status: Option<ComplaintStatus>) -> Result<Vec<Complaint>> {
        self.repository.list(status).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Complaint> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| complaint_not_found(id))
    }

    /// Set a new status; any status may follow any other
    pub async fn update_status(&self, id: Uuid, status: &str) -> Result<Complaint> {
        let status: ComplaintStatus = status.parse()?;

        let complaint = self
            .repository
            .update_status(id, status)
            .await?
            .ok_or_else(|| complaint_not_found(id))?;

        info!("Updated complaint {} status to {}", id, status);
        Ok(complaint)
    }

    pub async fn list_by_city(&self, city: &str) -> Result<Vec<Complaint>> {
        let city = city.trim();
        if city.is_empty() {
            return Err(AppError::Validation("city must not be empty".to_string()));
        }
        self.repository.find_by_city(city).await
    }

    pub async fn list_nearby(&self, search: &NearbySearch) -> Result<Vec<NearbyComplaint>> {
        self.repository.find_near(search).await
    }
}

fn complaint_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Complaint {} not found", id))
}
