use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::core::error::AppError;

/// Complaint status enum matching database enum
///
/// Any status may be set from any other; there is no enforced
/// `pending -> in_progress -> resolved` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "complaint_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    #[default]
    Pending,
    InProgress,
    Resolved,
}

impl ComplaintStatus {
    pub const ALL: [ComplaintStatus; 3] = [
        ComplaintStatus::Pending,
        ComplaintStatus::InProgress,
        ComplaintStatus::Resolved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintStatus::Pending => "pending",
            ComplaintStatus::InProgress => "in_progress",
            ComplaintStatus::Resolved => "resolved",
        }
    }

    pub fn allowed_values() -> Vec<&'static str> {
        Self::ALL.iter().map(|s| s.as_str()).collect()
    }
}

impl std::fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplaintStatus {
    type Err = AppError;

    /// Exact, case-sensitive match against the wire names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| AppError::InvalidStatus(s.to_string()))
    }
}

/// Database model for complaint
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Complaint {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub longitude: f64,
    pub latitude: f64,
    pub address: String,
    pub city: String,
    pub photos: Vec<String>,
    pub status: ComplaintStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Complaint returned by a proximity search, with its distance from the query point
#[derive(Debug, Clone, FromRow)]
pub struct NearbyComplaint {
    #[sqlx(flatten)]
    pub complaint: Complaint,
    pub distance_meters: f64,
}

/// Validated data for creating a new complaint
#[derive(Debug, Clone)]
pub struct NewComplaint {
    pub title: String,
    pub description: String,
    pub longitude: f64,
    pub latitude: f64,
    pub address: String,
    pub city: String,
    pub photos: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parses_wire_names() {
        assert_eq!(
            "pending".parse::<ComplaintStatus>().unwrap(),
            ComplaintStatus::Pending
        );
        assert_eq!(
            "in_progress".parse::<ComplaintStatus>().unwrap(),
            ComplaintStatus::InProgress
        );
        assert_eq!(
            "resolved".parse::<ComplaintStatus>().unwrap(),
            ComplaintStatus::Resolved
        );
    }

    #[test]
    fn test_status_rejects_unknown_values() {
        for value in ["", "done", "Resolved", "in-progress", " pending"] {
            assert!(matches!(
                value.parse::<ComplaintStatus>(),
                Err(AppError::InvalidStatus(_))
            ));
        }
    }

    #[test]
    fn test_status_defaults_to_pending() {
        assert_eq!(ComplaintStatus::default(), ComplaintStatus::Pending);
    }

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&ComplaintStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(ComplaintStatus::InProgress.to_string(), "in_progress");
    }
}
