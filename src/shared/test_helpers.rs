use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use tempfile::TempDir;

use crate::core::config::AppConfig;
use crate::features::complaints::repositories::InMemoryComplaintRepository;
use crate::features::complaints::{self, ComplaintService};
use crate::features::frontend;
use crate::features::uploads::{self, UploadService};
use crate::modules::storage::LocalStorage;

/// Test application: server over the real router, in-memory store, temp upload dir
pub struct TestApp {
    pub server: TestServer,
    pub repository: Arc<InMemoryComplaintRepository>,
    pub upload_dir: TempDir,
    pub public_dir: TempDir,
}

impl TestApp {
    /// Names of the files currently in the upload directory, sorted
    pub fn stored_photos(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.upload_dir.path())
            .expect("upload dir readable")
            .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

/// Body of the `index.html` the test frontend serves
pub const TEST_INDEX_HTML: &str = "<!DOCTYPE html><title>Civic Complaints</title>";

pub async fn setup_test_app() -> TestApp {
    let upload_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let public_dir = tempfile::tempdir().expect("Failed to create temp directory");
    std::fs::write(public_dir.path().join("index.html"), TEST_INDEX_HTML)
        .expect("Failed to write index.html");
    let storage = Arc::new(
        LocalStorage::new(upload_dir.path())
            .await
            .expect("Failed to create local storage"),
    );

    let repository = Arc::new(InMemoryComplaintRepository::new());
    let upload_service = Arc::new(UploadService::new(Arc::clone(&storage)));
    let complaint_service = Arc::new(ComplaintService::new(
        repository.clone(),
        upload_service,
    ));

    let app = Router::new()
        .merge(complaints::routes(
            complaint_service,
            AppConfig::DEFAULT_MAX_REQUEST_BODY_SIZE,
        ))
        .merge(uploads::routes(&storage))
        .merge(frontend::routes(public_dir.path()));

    let server = TestServer::new(app).expect("Failed to create test server");

    TestApp {
        server,
        repository,
        upload_dir,
        public_dir,
    }
}
