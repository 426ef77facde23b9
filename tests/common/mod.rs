//! Shared helpers for HTTP API tests.

#![allow(dead_code)]

use axum::Router;
use axum_test::TestServer;
use localshare::config::Config;
use localshare::web::handlers::AppState;
use localshare::web::middleware::RateLimitState;
use localshare::web::router::create_router;
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

pub const TEST_PIN: &str = "1234";
pub const TEST_ADMIN_USER: &str = "admin";
pub const TEST_ADMIN_PASS: &str = "s3cret-pass";

/// A test server bound to a scratch upload directory.
pub struct TestApp {
    pub server: TestServer,
    pub dir: TempDir,
}

impl TestApp {
    /// Path of a file in the upload directory.
    pub fn path(&self, name: &str) -> std::path::PathBuf {
        self.dir.path().join(name)
    }

    /// Write a file directly into the upload directory.
    pub fn seed(&self, name: &str, contents: &[u8]) {
        std::fs::write(self.path(name), contents).expect("Failed to seed file");
    }

    /// Whether a file exists in the upload directory.
    pub fn has_file(&self, name: &str) -> bool {
        self.path(name).exists()
    }

    /// Submit the test PIN.
    pub async fn verify_pin(&self) {
        self.server
            .post("/api/verify-pin")
            .json(&json!({ "pin": TEST_PIN }))
            .await
            .assert_status_ok();
    }

    /// Log in with the test admin credentials.
    pub async fn admin_login(&self) {
        self.server
            .post("/api/admin/login")
            .json(&json!({ "username": TEST_ADMIN_USER, "password": TEST_ADMIN_PASS }))
            .await
            .assert_status_ok();
    }
}

/// Base configuration: no PIN, no admin, 1 MB uploads.
pub fn base_config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.files.upload_dir = dir.to_string_lossy().into_owned();
    config.files.max_file_size_mb = 1;
    config.server.auth_rate_limit = 1000;
    config
}

/// Enable PIN protection with [`TEST_PIN`].
pub fn with_pin(config: &mut Config) {
    config.auth.pin = TEST_PIN.to_string();
}

/// Enable admin login with the test credentials.
pub fn with_admin(config: &mut Config) {
    config.auth.admin_enabled = true;
    config.auth.admin_user = TEST_ADMIN_USER.to_string();
    config.auth.admin_pass = TEST_ADMIN_PASS.to_string();
}

/// Build the API router over a scratch upload directory.
pub fn create_test_router(configure: impl FnOnce(&mut Config)) -> (Router, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut config = base_config(dir.path());
    configure(&mut config);
    config.validate().expect("Invalid test config");

    let app_state = Arc::new(AppState::new(&config));
    let rate_limit_state = Arc::new(RateLimitState::new(config.server.auth_rate_limit));
    let router = create_router(app_state, rate_limit_state, &config.server.cors_origins);

    (router, dir)
}

/// Create a cookie-saving test server with a customised configuration.
pub fn create_test_app(configure: impl FnOnce(&mut Config)) -> TestApp {
    let (router, dir) = create_test_router(configure);

    let server = TestServer::builder()
        .save_cookies()
        .build(router)
        .expect("Failed to create test server");

    TestApp { server, dir }
}
