//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::api::auth::AdminCredentials;
use crate::service::GradebookService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Gradebook service over the roster and event log.
    pub gradebook: Arc<GradebookService>,
    /// Credentials checked by the admin guard.
    pub admin: Arc<AdminCredentials>,
    /// Reject submissions for students missing from the roster.
    pub require_roster_match: bool,
}
