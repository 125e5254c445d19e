//! Test helpers: build AppState and router for integration tests.
//!
//! The storage, extraction and persistence ports are in-memory doubles, so
//! these tests need neither Docker nor network access.

#![allow(dead_code)]

pub mod fixtures;

use axum_test::TestServer;
use receipt_api::constants;
use receipt_api::setup::routes;
use receipt_api::state::{AppState, UploadConfig};
use receipt_core::Config;
use receipt_services::test_helpers::{InMemoryReceiptRepository, MockExtractor, MockStorage};
use receipt_services::{ReceiptExtractor, ReceiptIngestionService, ReceiptRepositoryTrait, Storage};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub const STORED_IMAGE_URL: &str = "http://storage.test/receipts/lunch.png";

/// API path prefix for tests (e.g. `/api/v0`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Test application: server plus handles on the port doubles
pub struct TestApp {
    pub server: TestServer,
    pub storage: Arc<MockStorage>,
    pub extractor: Arc<MockExtractor>,
    pub repository: Arc<InMemoryReceiptRepository>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

/// Configuration with local storage and a 1 MB upload limit
pub fn create_test_config() -> Config {
    let values: HashMap<&str, &str> = [
        ("DATABASE_URL", "postgresql://localhost/receipts_test"),
        ("GEMINI_API_KEY", "test-gemini-key-123"),
        ("STORAGE_BACKEND", "local"),
        ("LOCAL_STORAGE_PATH", "/tmp/receipts-test"),
        ("LOCAL_STORAGE_BASE_URL", "http://localhost:8080/files"),
        ("MAX_FILE_SIZE_MB", "1"),
    ]
    .into_iter()
    .collect();

    Config::from_lookup(|key| values.get(key).map(|v| v.to_string()))
        .expect("Failed to build test config")
}

/// Builder for a test app; every port defaults to a well-behaved double
pub struct TestAppBuilder {
    storage: MockStorage,
    extractor: MockExtractor,
    repository: InMemoryReceiptRepository,
    request_timeout: Option<Duration>,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            storage: MockStorage::with_url(STORED_IMAGE_URL),
            extractor: MockExtractor::returning(receipt_services::test_helpers::sample_fields()),
            repository: InMemoryReceiptRepository::new(),
            request_timeout: None,
        }
    }

    pub fn storage(mut self, storage: MockStorage) -> Self {
        self.storage = storage;
        self
    }

    pub fn extractor(mut self, extractor: MockExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn repository(mut self, repository: InMemoryReceiptRepository) -> Self {
        self.repository = repository;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub async fn build(self) -> TestApp {
        let config = create_test_config();

        let storage = Arc::new(self.storage);
        let extractor = Arc::new(self.extractor);
        let repository = Arc::new(self.repository);

        let storage_port: Arc<dyn Storage> = storage.clone();
        let extractor_port: Arc<dyn ReceiptExtractor> = extractor.clone();
        let repository_port: Arc<dyn ReceiptRepositoryTrait> = repository.clone();

        let state = Arc::new(AppState {
            ingestion: ReceiptIngestionService::new(
                storage_port.clone(),
                extractor_port,
                repository_port.clone(),
            ),
            receipts: repository_port,
            storage: storage_port,
            upload: UploadConfig::from(&config),
            request_timeout: self.request_timeout,
            shutdown: CancellationToken::new(),
        });

        let router = routes::setup_routes(&config, state)
            .await
            .expect("Failed to setup routes");
        let server = TestServer::new(router).expect("Failed to create test server");

        TestApp {
            server,
            storage,
            extractor,
            repository,
        }
    }
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Test app with default doubles
pub async fn setup_test_app() -> TestApp {
    TestAppBuilder::new().build().await
}
