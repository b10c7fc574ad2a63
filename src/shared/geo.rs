use crate::core::error::{AppError, Result};

/// Sphere radius in meters assumed by `earthdistance` (its `earth()` function)
#[cfg(test)]
pub const EARTH_RADIUS_METERS: f64 = 6_378_168.0;

/// Haversine distance between two points in meters, matching `earth_distance`.
/// Only the in-memory store needs it; Postgres computes distances itself.
#[cfg(test)]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_METERS * c
}

/// Reject coordinates that are not finite or fall outside WGS84 bounds
pub fn validate_coordinates(longitude: f64, latitude: f64) -> Result<()> {
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(AppError::Validation(
            "longitude must be a number between -180 and 180".to_string(),
        ));
    }
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(AppError::Validation(
            "latitude must be a number between -90 and 90".to_string(),
        ));
    }
    Ok(())
}
