//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p meshlink-api`.

#![allow(dead_code)]

pub mod fixtures;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::{TestResponse, TestServer};
use chrono::{TimeZone, Utc};
use meshlink_api::setup::routes;
use meshlink_api::state::AppState;
use meshlink_core::{Config, ManualClock};
use meshlink_processing::{BasicRepairer, MeshCodec};
use meshlink_services::DownloadRegistry;
use meshlink_storage::ScratchStorage;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

pub const BASE_URL: &str = "http://meshlink.test";
pub const TEST_TTL: Duration = Duration::from_millis(1000);

/// Test application: server plus the handles tests use to steer and inspect it.
pub struct TestApp {
    pub server: TestServer,
    pub clock: Arc<ManualClock>,
    pub registry: Arc<DownloadRegistry>,
    pub scratch_dir: PathBuf,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Upload `contents` as `file_name` to the link endpoint.
    pub async fn upload(&self, file_name: &str, contents: &str) -> TestResponse {
        let part = Part::bytes(bytes::Bytes::from(contents.to_string()))
            .file_name(file_name)
            .mime_type("text/plain");
        self.server
            .post("/api/generate-link")
            .multipart(MultipartForm::new().add_part("file", part))
            .await
    }

    /// Upload a valid mesh and return its token.
    pub async fn upload_token(&self, file_name: &str) -> String {
        let response = self.upload(file_name, fixtures::TRIANGLE_PAIR_OBJ).await;
        assert_eq!(response.status_code(), 200);
        let body: serde_json::Value = response.json();
        token_from_url(
            body.get("downloadUrl")
                .and_then(|v| v.as_str())
                .expect("Expected 'downloadUrl' in upload response"),
        )
    }

    /// Regular files currently in the scratch directory.
    pub fn scratch_files(&self) -> Vec<PathBuf> {
        list_files(&self.scratch_dir)
    }

    /// Poll until the scratch directory holds exactly `expected` files.
    pub async fn wait_for_file_count(&self, expected: usize) -> bool {
        for _ in 0..200 {
            if self.scratch_files().len() == expected {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }

    /// Poll until no scratch file has `extension`. Deletes run in the background.
    pub async fn wait_for_no_files_with_extension(&self, extension: &str) -> bool {
        for _ in 0..200 {
            if !self
                .scratch_files()
                .iter()
                .any(|p| p.extension().and_then(|e| e.to_str()) == Some(extension))
            {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }
}

pub fn token_from_url(url: &str) -> String {
    url.rsplit('/').next().unwrap_or_default().to_string()
}

pub fn list_files(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect()
}

pub async fn wait_until_gone(path: &Path) -> bool {
    for _ in 0..200 {
        if !path.exists() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

pub fn create_test_config(scratch_dir: &Path) -> Config {
    Config {
        environment: "test".to_string(),
        scratch_dir: scratch_dir.to_path_buf(),
        download_ttl: TEST_TTL,
        cleanup_interval: None,
        max_file_size_bytes: 1024 * 1024,
        public_base_url: Some(BASE_URL.to_string()),
        purge_scratch_on_start: false,
        ..Config::default()
    }
}

pub async fn setup_test_app() -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let config = create_test_config(temp_dir.path());

    let storage = ScratchStorage::new(temp_dir.path())
        .await
        .expect("Failed to create scratch storage");
    let scratch_dir = storage.base_path().to_path_buf();

    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
    ));
    let registry = Arc::new(DownloadRegistry::new(clock.clone()));

    let state = Arc::new(AppState {
        config: config.clone(),
        registry: registry.clone(),
        storage,
        converter: Arc::new(MeshCodec),
        repairer: Arc::new(BasicRepairer::default()),
    });

    let app = routes::setup_routes(&config, state).expect("Failed to build router");
    let server = TestServer::new(app).expect("Failed to create test server");

    TestApp {
        server,
        clock,
        registry,
        scratch_dir,
        _temp_dir: temp_dir,
    }
}
