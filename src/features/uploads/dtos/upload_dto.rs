use axum::body::Bytes;

use crate::shared::constants::MAX_PHOTO_SIZE;

/// A photo part read from a multipart request, not yet written anywhere
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub original_filename: String,
    pub content_type: String,
    pub data: Bytes,
}

impl PhotoUpload {
    pub fn new(
        original_filename: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            original_filename: original_filename.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Any `image/*` type is accepted, parameters and case ignored
pub fn is_image_mime_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.strip_prefix("image/") {
        Some(subtype) => !subtype.is_empty(),
        None => false,
    }
}

pub fn max_photo_size_mb() -> usize {
    MAX_PHOTO_SIZE / 1024 / 1024
}
