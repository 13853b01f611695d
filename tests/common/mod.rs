//! Shared fixtures for router-level tests.

#![allow(dead_code, clippy::panic)]

use std::fs;
use std::sync::Arc;

use axum::Router;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use lab_gradebook::api;
use lab_gradebook::api::auth::AdminCredentials;
use lab_gradebook::app_state::AppState;
use lab_gradebook::service::GradebookService;

pub const ADMIN_USER: &str = "werat";
pub const ADMIN_PASS: &str = "pikachu";

/// A data directory plus the application built over it.
pub struct TestApp {
    pub dir: tempfile::TempDir,
    pub app: Router,
}

/// Builds an app over a fresh data directory holding `roster`.
pub fn test_app(roster: &str, require_roster_match: bool) -> TestApp {
    let Ok(dir) = tempfile::tempdir() else {
        panic!("tempdir");
    };
    if fs::write(dir.path().join("students.txt"), roster).is_err() {
        panic!("roster write failed");
    }
    let state = AppState {
        gradebook: Arc::new(GradebookService::open(dir.path())),
        admin: Arc::new(AdminCredentials::new(ADMIN_USER, ADMIN_PASS)),
        require_roster_match,
    };
    TestApp {
        dir,
        app: api::build_app(state),
    }
}

/// `Authorization` header value for the test admin.
pub fn admin_auth() -> String {
    format!("Basic {}", BASE64.encode(format!("{ADMIN_USER}:{ADMIN_PASS}")))
}
