use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::complaints::dtos::NearbySearch;
use crate::features::complaints::models::{
    Complaint, ComplaintStatus, NearbyComplaint, NewComplaint,
};
use crate::features::complaints::repositories::ComplaintRepository;
use crate::shared::geo::haversine_distance;

/// In-memory complaint store for HTTP tests
#[derive(Default)]
pub struct InMemoryComplaintRepository {
    complaints: Mutex<Vec<Complaint>>,
    fail_writes: Mutex<bool>,
}

impl InMemoryComplaintRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent creates fail like an unreachable database
    pub fn fail_writes(&self) {
        *self.fail_writes.lock().unwrap() = true;
    }

    pub fn len(&self) -> usize {
        self.complaints.lock().unwrap().len()
    }

    fn newest_first(mut items: Vec<Complaint>) -> Vec<Complaint> {
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        items
    }
}

#[async_trait]
impl ComplaintRepository for InMemoryComplaintRepository {
    async fn create(&self, data: &NewComplaint) -> Result<Complaint> {
        if *self.fail_writes.lock().unwrap() {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }

        let now = Utc::now();
        let complaint = Complaint {
            id: Uuid::new_v4(),
            title: data.title.clone(),
            description: data.description.clone(),
            longitude: data.longitude,
            latitude: data.latitude,
            address: data.address.clone(),
            city: data.city.clone(),
            photos: data.photos.clone(),
            status: ComplaintStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        self.complaints.lock().unwrap().push(complaint.clone());
        Ok(complaint)
    }

    async fn list(&self, status: Option<ComplaintStatus>) -> Result<Vec<Complaint>> {
        let items = self
            .complaints
            .lock()
            .unwrap()
            .iter()
            .filter(|c| status.map_or(true, |s| c.status == s))
            .cloned()
            .collect();
        Ok(Self::newest_first(items))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Complaint>> {
        Ok(self
            .complaints
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: ComplaintStatus,
    ) -> Result<Option<Complaint>> {
        let mut complaints = self.complaints.lock().unwrap();
        Ok(complaints.iter_mut().find(|c| c.id == id).map(|c| {
            c.status = status;
            c.updated_at = Utc::now();
            c.clone()
        }))
    }

    async fn find_by_city(&self, city: &str) -> Result<Vec<Complaint>> {
        let needle = city.to_lowercase();
        let items = self
            .complaints
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.city.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        Ok(Self::newest_first(items))
    }

    async fn find_near(&self, search: &NearbySearch) -> Result<Vec<NearbyComplaint>> {
        let mut hits: Vec<NearbyComplaint> = self
            .complaints
            .lock()
            .unwrap()
            .iter()
            .map(|c| NearbyComplaint {
                distance_meters: haversine_distance(
                    search.latitude,
                    search.longitude,
                    c.latitude,
                    c.longitude,
                ),
                complaint: c.clone(),
            })
            .filter(|n| n.distance_meters <= search.max_distance_meters)
            .collect();

        hits.sort_by(|a, b| {
            a.distance_meters
                .total_cmp(&b.distance_meters)
                .then_with(|| b.complaint.created_at.cmp(&a.complaint.created_at))
        });
        Ok(hits)
    }
}
