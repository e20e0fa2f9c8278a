//! Common test utilities for vendhub integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use tempfile::TempDir;

use vendhub_service::{create_router, AppState, ServiceConfig};
use vendhub_store::{InventoryStore, RocksBackend};

const TABLE: &str = "vendhub";

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: TempDir,
}

impl TestHarness {
    /// Create a new test harness with a fresh database.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let backend =
            Arc::new(RocksBackend::open(temp_dir.path(), &[TABLE]).expect("Failed to open store"));
        let store = Arc::new(InventoryStore::new(backend, TABLE));

        let config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            data_dir: temp_dir.path().to_string_lossy().to_string(),
            table_name: TABLE.into(),
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
        };

        let state = AppState::new(store, config);
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            _temp_dir: temp_dir,
        }
    }

    /// Create a machine and return its ID.
    pub async fn create_machine(&self, name: &str) -> String {
        let response = self
            .server
            .post("/api/v1/machines")
            .json(&serde_json::json!({ "name": name }))
            .await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        body["id"].as_str().expect("machine ID in response").to_owned()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
