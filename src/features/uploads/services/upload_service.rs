use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info};

use crate::core::error::{AppError, Result};
use crate::features::uploads::dtos::{is_image_mime_type, max_photo_size_mb, PhotoUpload};
use crate::modules::storage::LocalStorage;
use crate::shared::constants::{MAX_PHOTOS_PER_COMPLAINT, MAX_PHOTO_SIZE};
use crate::shared::validation::sanitize_filename;

/// Service for complaint photo uploads
///
/// A batch is all-or-nothing: every photo is checked before the first write,
/// and a failed write removes whatever the batch already stored.
pub struct UploadService {
    storage: Arc<LocalStorage>,
}

impl UploadService {
    pub fn new(storage: Arc<LocalStorage>) -> Self {
        Self { storage }
    }

    /// Check count, MIME type and size of every photo in the batch
    pub fn validate_batch(photos: &[PhotoUpload]) -> Result<()> {
        if photos.len() > MAX_PHOTOS_PER_COMPLAINT {
            return Err(AppError::UploadRejected(format!(
                "Too many photos. At most {} photos are allowed",
                MAX_PHOTOS_PER_COMPLAINT
            )));
        }

        for photo in photos {
            if !is_image_mime_type(&photo.content_type) {
                return Err(AppError::UploadRejected(format!(
                    "Only image files are allowed, '{}' has type '{}'",
                    photo.original_filename, photo.content_type
                )));
            }
            if photo.size() > MAX_PHOTO_SIZE {
                return Err(AppError::UploadRejected(format!(
                    "Photo '{}' is too large. Maximum size is {} MB",
                    photo.original_filename,
                    max_photo_size_mb()
                )));
            }
        }

        Ok(())
    }

    /// Stored name: upload time in unix millis, a dash, then the sanitized original name.
    ///
    /// Two uploads of the same name within the same millisecond map to the same
    /// stored name and the later one wins.
    pub fn stored_name(original_filename: &str) -> String {
        format!(
            "{}-{}",
            Utc::now().timestamp_millis(),
            sanitize_filename(original_filename)
        )
    }

    /// Validate and write a batch, returning stored names in the order received
    pub async fn store_batch(&self, photos: Vec<PhotoUpload>) -> Result<Vec<String>> {
        Self::validate_batch(&photos)?;

        let mut stored: Vec<String> = Vec::with_capacity(photos.len());

        for photo in photos {
            let name = Self::stored_name(&photo.original_filename);

            if let Err(e) = self.storage.upload(&name, &photo.data).await {
                error!(
                    "Failed to store photo '{}' as {}: {}",
                    photo.original_filename, name, e
                );
                self.storage.delete_all(&stored).await;
                return Err(e);
            }

            debug!(
                "Stored photo '{}' as {} ({} bytes, {})",
                photo.original_filename,
                name,
                photo.size(),
                photo.content_type
            );
            stored.push(name);
        }

        if !stored.is_empty() {
            info!("Stored {} photo(s)", stored.len());
        }

        Ok(stored)
    }

    /// Remove a previously stored batch (used when the complaint insert fails)
    pub async fn discard(&self, names: &[String]) {
        if names.is_empty() {
            return;
        }
        self.storage.delete_all(names).await;
        info!("Discarded {} photo(s)", names.len());
    }
}
