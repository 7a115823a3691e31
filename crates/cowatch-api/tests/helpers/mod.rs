//! Test helpers: build the real router around in-memory metadata and a
//! temp-dir blob store, both wrapped for fault injection.
//!
//! Run from the workspace root: `cargo test -p cowatch-api`.

#![allow(dead_code)]

pub mod fixtures;
pub mod repository;
pub mod storage;

use axum_test::TestServer;
use cowatch_api::constants;
use cowatch_api::setup::{routes, services};
use cowatch_api::{LifecycleOptions, VideoLifecycleService};
use cowatch_core::{Config, VideoServiceConfig};
use cowatch_storage::LocalStorage;
use repository::FlakyRepository;
use std::collections::HashMap;
use std::sync::Arc;
use storage::FlakyStorage;
use tempfile::TempDir;

pub const MEDIA_BASE_URL: &str = "http://localhost:8080/media";

/// API path prefix for tests (e.g. `/api/v1/videos`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

pub struct TestApp {
    pub server: TestServer,
    pub storage: Arc<FlakyStorage>,
    pub repository: Arc<FlakyRepository>,
    pub _temp_dir: TempDir,
}

pub fn test_config(temp_dir: &TempDir, extra: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = HashMap::new();
    vars.insert("STORAGE_BACKEND".into(), "local".into());
    vars.insert("METADATA_BACKEND".into(), "memory".into());
    vars.insert(
        "LOCAL_STORAGE_PATH".into(),
        temp_dir.path().to_string_lossy().to_string(),
    );
    vars.insert("LOCAL_STORAGE_BASE_URL".into(), MEDIA_BASE_URL.into());
    vars.insert("MAX_UPLOAD_SIZE_MB".into(), "1".into());
    for (key, value) in extra {
        vars.insert((*key).to_string(), (*value).to_string());
    }

    let inner = VideoServiceConfig::from_vars(|key| vars.get(key).cloned())
        .expect("Failed to build test config");
    Config(Box::new(inner))
}

async fn test_stores(temp_dir: &TempDir) -> (Arc<FlakyStorage>, Arc<FlakyRepository>) {
    let local = LocalStorage::new(temp_dir.path(), MEDIA_BASE_URL.to_string(), "videos/")
        .await
        .expect("Failed to create local storage");
    (
        Arc::new(FlakyStorage::new(Arc::new(local))),
        Arc::new(FlakyRepository::new()),
    )
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(&[]).await
}

/// Same as [`setup_test_app`] with extra configuration variables.
pub async fn setup_test_app_with(extra: &[(&str, &str)]) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let config = test_config(&temp_dir, extra);
    let (storage, repository) = test_stores(&temp_dir).await;

    let state = services::build_state(config.clone(), storage.clone(), repository.clone());
    let app = routes::setup_routes(&config, state).expect("Failed to build router");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        storage,
        repository,
        _temp_dir: temp_dir,
    }
}

/// Lifecycle service without HTTP, plus handles on its stores.
pub struct TestService {
    pub service: VideoLifecycleService,
    pub storage: Arc<FlakyStorage>,
    pub repository: Arc<FlakyRepository>,
    pub _temp_dir: TempDir,
}

pub async fn setup_test_service(verify_uploads: bool) -> TestService {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let (storage, repository) = test_stores(&temp_dir).await;

    let service = VideoLifecycleService::new(
        storage.clone(),
        repository.clone(),
        LifecycleOptions {
            verify_uploads,
            api_prefix: constants::API_PREFIX.to_string(),
            max_upload_bytes: 1024 * 1024,
        },
    );

    TestService {
        service,
        storage,
        repository,
        _temp_dir: temp_dir,
    }
}
