//! Test helpers: build the router over a temporary storage root.
//!
//! Run from workspace root: `cargo test -p inkwell-api`.

use std::collections::HashMap;
use std::path::Path;

use axum_test::TestServer;
use inkwell_core::Config;
use tempfile::TempDir;

pub const HANDLER: &str = "/editor/controller";

/// Test application: server plus the storage directory it writes into.
pub struct TestApp {
    pub server: TestServer,
    pub dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }
}

/// Setup a test app; `overrides` are applied on top of the default settings.
pub async fn setup_test_app(overrides: &[(&str, &str)]) -> TestApp {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");

    let mut vars: HashMap<String, String> = HashMap::new();
    vars.insert(
        "STORAGE_ROOT".to_string(),
        dir.path().to_string_lossy().into_owned(),
    );
    vars.insert("CATCHER_BLOCK_PRIVATE_NETWORKS".to_string(), "false".to_string());
    vars.insert("CATCHER_TIMEOUT_SECS".to_string(), "5".to_string());
    for (key, value) in overrides {
        vars.insert(key.to_string(), value.to_string());
    }

    let config = Config::from_lookup(|key| vars.get(key).cloned()).expect("Invalid test config");
    let (_state, router) = inkwell_api::setup::build_app(config)
        .await
        .expect("Failed to build app");

    let server = TestServer::new(router.into_make_service()).expect("Failed to create test server");

    TestApp { server, dir }
}

/// Parse an envelope body; the editor route always answers `text/plain` JSON.
pub fn envelope(text: &str) -> serde_json::Value {
    serde_json::from_str(text).expect("Response body is not JSON")
}
