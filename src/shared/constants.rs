/// Maximum number of photos attached to a single complaint
pub const MAX_PHOTOS_PER_COMPLAINT: usize = 5;

/// Maximum size of a single photo in bytes (10MB)
pub const MAX_PHOTO_SIZE: usize = 10 * 1024 * 1024;

/// Multipart field carrying the photos
pub const PHOTOS_FIELD: &str = "photos";

/// Search radius for nearby complaints when the caller gives none
pub const DEFAULT_MAX_DISTANCE_METERS: f64 = 5000.0;

/// URL prefix under which uploaded photos are served
pub const UPLOADS_ROUTE: &str = "/uploads";
