use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::complaints::dtos::NearbySearch;
use crate::features::complaints::models::{
    Complaint, ComplaintStatus, NearbyComplaint, NewComplaint,
};

/// Persistence for complaints
///
/// Every list comes back newest first, except proximity results which are
/// ordered by distance.
#[async_trait]
pub trait ComplaintRepository: Send + Sync {
    /// Insert a complaint; id and both timestamps are assigned by the store
    async fn create(&self, data: &NewComplaint) -> Result<Complaint>;

    async fn list(&self, status: Option<ComplaintStatus>) -> Result<Vec<Complaint>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Complaint>>;

    /// Set status and refresh `updated_at`; `None` when no such complaint
    async fn update_status(&self, id: Uuid, status: ComplaintStatus)
        -> Result<Option<Complaint>>;

    /// Case-insensitive substring match on city
    async fn find_by_city(&self, city: &str) -> Result<Vec<Complaint>>;

    /// Complaints within the search radius, nearest first
    async fn find_near(&self, search: &NearbySearch) -> Result<Vec<NearbyComplaint>>;
}

const COMPLAINT_COLUMNS: &str = r#"
    id, title, description, longitude, latitude, address, city,
    photos, status, created_at, updated_at
"#;

/// PostgreSQL-backed complaint store
///
/// Proximity queries use the `earthdistance` extension over a GiST index on
/// `ll_to_earth(latitude, longitude)`.
pub struct PgComplaintRepository {
    pool: PgPool,
}

impl PgComplaintRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ComplaintRepository for PgComplaintRepository {
    async fn create(&self, data: &NewComplaint) -> Result<Complaint> {
        let sql = format!(
            r#"
            INSERT INTO complaints (title, description, longitude, latitude, address, city, photos)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            COMPLAINT_COLUMNS
        );

        sqlx::query_as::<_, Complaint>(&sql)
            .bind(&data.title)
            .bind(&data.description)
            .bind(data.longitude)
            .bind(data.latitude)
            .bind(&data.address)
            .bind(&data.city)
            .bind(&data.photos)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create complaint: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn list(&self, status: Option<ComplaintStatus>) -> Result<Vec<Complaint>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM complaints
            WHERE ($1::complaint_status IS NULL OR status = $1)
            ORDER BY created_at DESC
            "#,
            COMPLAINT_COLUMNS
        );

        sqlx::query_as::<_, Complaint>(&sql)
            .bind(status)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list complaints: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Complaint>> {
        let sql = format!("SELECT {} FROM complaints WHERE id = $1", COMPLAINT_COLUMNS);

        sqlx::query_as::<_, Complaint>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch complaint {}: {:?}", id, e);
                AppError::Database(e)
            })
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: ComplaintStatus,
    ) -> Result<Option<Complaint>> {
        let sql = format!(
            r#"
            UPDATE complaints
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            COMPLAINT_COLUMNS
        );

        sqlx::query_as::<_, Complaint>(&sql)
            .bind(id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update complaint status {}: {:?}", id, e);
                AppError::Database(e)
            })
    }

    async fn find_by_city(&self, city: &str) -> Result<Vec<Complaint>> {
        // strpos keeps the term literal; no LIKE or regex metacharacters apply
        let sql = format!(
            r#"
            SELECT {}
            FROM complaints
            WHERE strpos(lower(city), lower($1)) > 0
            ORDER BY created_at DESC
            "#,
            COMPLAINT_COLUMNS
        );

        sqlx::query_as::<_, Complaint>(&sql)
            .bind(city)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to search complaints by city: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn find_near(&self, search: &NearbySearch) -> Result<Vec<NearbyComplaint>> {
        // earth_box is a cheap indexed prefilter; earth_distance is the exact cut
        let sql = format!(
            r#"
            SELECT {}, distance_meters
            FROM (
                SELECT *,
                    earth_distance(ll_to_earth($2, $1), ll_to_earth(latitude, longitude))
                        AS distance_meters
                FROM complaints
                WHERE earth_box(ll_to_earth($2, $1), $3) @> ll_to_earth(latitude, longitude)
            ) AS candidates
            WHERE distance_meters <= $3
            ORDER BY distance_meters ASC, created_at DESC
            "#,
            COMPLAINT_COLUMNS
        );

        sqlx::query_as::<_, NearbyComplaint>(&sql)
            .bind(search.longitude)
            .bind(search.latitude)
            .bind(search.max_distance_meters)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to search nearby complaints: {:?}", e);
                AppError::Database(e)
            })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn new_complaint(title: &str, city: &str, longitude: f64, latitude: f64) -> NewComplaint {
        NewComplaint {
            title: title.to_string(),
            description: format!("{} reported by a resident", title),
            longitude,
            latitude,
            address: "Main St".to_string(),
            city: city.to_string(),
            photos: Vec::new(),
        }
    }

    /// Insert in order, keeping created_at strictly increasing
    async fn seed(repo: &PgComplaintRepository, items: &[NewComplaint]) -> Vec<Complaint> {
        let mut created = Vec::new();
        for item in items {
            created.push(repo.create(item).await.unwrap());
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        created
    }

    fn titles(complaints: &[Complaint]) -> Vec<&str> {
        complaints.iter().map(|c| c.title.as_str()).collect()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_and_find_by_id(pool: PgPool) {
        let repo = PgComplaintRepository::new(pool);
        let mut data = new_complaint("Pothole", "Bengaluru", 77.5946, 12.9716);
        data.photos = vec!["1700000000000-a.jpg".to_string()];

        let created = repo.create(&data).await.unwrap();

        assert_eq!(created.status, ComplaintStatus::Pending);
        assert_eq!(created.created_at, created.updated_at);
        assert_eq!(created.longitude, 77.5946);
        assert_eq!(created.latitude, 12.9716);
        assert_eq!(created.photos, data.photos);

        let found = repo.find_by_id(created.id).await.unwrap();
        assert_eq!(found, Some(created));
        assert!(repo.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_list_newest_first_with_status_filter(pool: PgPool) {
        let repo = PgComplaintRepository::new(pool);
        let created = seed(
            &repo,
            &[
                new_complaint("first", "Bengaluru", 77.59, 12.97),
                new_complaint("second", "Bengaluru", 77.59, 12.97),
                new_complaint("third", "Bengaluru", 77.59, 12.97),
            ],
        )
        .await;

        let all = repo.list(None).await.unwrap();
        assert_eq!(titles(&all), vec!["third", "second", "first"]);

        repo.update_status(created[1].id, ComplaintStatus::Resolved)
            .await
            .unwrap();

        let resolved = repo.list(Some(ComplaintStatus::Resolved)).await.unwrap();
        assert_eq!(titles(&resolved), vec!["second"]);

        let pending = repo.list(Some(ComplaintStatus::Pending)).await.unwrap();
        assert_eq!(titles(&pending), vec!["third", "first"]);

        let in_progress = repo.list(Some(ComplaintStatus::InProgress)).await.unwrap();
        assert!(in_progress.is_empty());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_update_status_refreshes_updated_at(pool: PgPool) {
        let repo = PgComplaintRepository::new(pool);
        let created = repo
            .create(&new_complaint("Pothole", "Bengaluru", 77.5946, 12.9716))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;

        let updated = repo
            .update_status(created.id, ComplaintStatus::InProgress)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.status, ComplaintStatus::InProgress);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.created_at);

        let missing = repo
            .update_status(Uuid::new_v4(), ComplaintStatus::Resolved)
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_find_by_city_is_literal_and_case_insensitive(pool: PgPool) {
        let repo = PgComplaintRepository::new(pool);
        seed(
            &repo,
            &[
                new_complaint("old", "Springfield", 77.59, 12.97),
                new_complaint("elsewhere", "Bengaluru", 77.59, 12.97),
                new_complaint("new", "Springfield", 77.59, 12.97),
            ],
        )
        .await;

        let found = repo.find_by_city("SPRING").await.unwrap();
        assert_eq!(titles(&found), vec!["new", "old"]);

        let found = repo.find_by_city("field").await.unwrap();
        assert_eq!(titles(&found), vec!["new", "old"]);

        for pattern in ["%", "_", ".*", "Spring%"] {
            let found = repo.find_by_city(pattern).await.unwrap();
            assert!(found.is_empty(), "{}", pattern);
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_find_near_orders_by_distance_within_radius(pool: PgPool) {
        let repo = PgComplaintRepository::new(pool);
        seed(
            &repo,
            &[
                // ~5.4km from the query point
                new_complaint("far", "Bengaluru", 77.6400, 12.9716),
                // ~530m from the query point
                new_complaint("main", "Bengaluru", 77.5946, 12.9716),
                new_complaint("mysuru", "Mysuru", 76.6394, 12.2958),
            ],
        )
        .await;

        let search = |max_distance_meters| NearbySearch {
            longitude: 77.59,
            latitude: 12.97,
            max_distance_meters,
        };

        let hits = repo.find_near(&search(10_000.0)).await.unwrap();
        let names: Vec<&str> = hits.iter().map(|h| h.complaint.title.as_str()).collect();
        assert_eq!(names, vec!["main", "far"]);
        assert!(hits[0].distance_meters > 500.0 && hits[0].distance_meters < 560.0);
        assert!(hits[1].distance_meters > 5_000.0 && hits[1].distance_meters < 10_000.0);

        let hits = repo.find_near(&search(5_000.0)).await.unwrap();
        let names: Vec<&str> = hits.iter().map(|h| h.complaint.title.as_str()).collect();
        assert_eq!(names, vec!["main"]);

        assert!(repo.find_near(&search(1.0)).await.unwrap().is_empty());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_find_near_ties_break_newest_first(pool: PgPool) {
        let repo = PgComplaintRepository::new(pool);
        seed(
            &repo,
            &[
                new_complaint("older", "Bengaluru", 77.5946, 12.9716),
                new_complaint("newer", "Bengaluru", 77.5946, 12.9716),
            ],
        )
        .await;

        let hits = repo
            .find_near(&NearbySearch {
                longitude: 77.5946,
                latitude: 12.9716,
                max_distance_meters: 1.0,
            })
            .await
            .unwrap();

        let names: Vec<&str> = hits.iter().map(|h| h.complaint.title.as_str()).collect();
        assert_eq!(names, vec!["newer", "older"]);
    }
}
