//! Endpoint handlers organized by resource.

pub mod admin;
pub mod scores;
pub mod students;
pub mod system;

use std::sync::Arc;

use axum::Router;
use axum::middleware;

use crate::api::auth::require_admin;
use crate::app_state::AppState;
use crate::error::GradebookError;
use crate::service::GradebookService;

/// Composes public routes with the guarded admin routes.
pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(scores::routes())
        .merge(students::routes())
        .merge(
            admin::routes()
                .route_layer(middleware::from_fn_with_state(state.clone(), require_admin)),
        )
}

/// Runs a blocking gradebook call off the async executor.
///
/// Every gradebook operation is a synchronous file scan or append.
async fn run_blocking<T, E, F>(state: &AppState, op: F) -> Result<T, GradebookError>
where
    F: FnOnce(&GradebookService) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<GradebookError> + Send + 'static,
{
    let gradebook = Arc::clone(&state.gradebook);
    tokio::task::spawn_blocking(move || op(&gradebook))
        .await
        .map_err(|err| GradebookError::Internal(format!("blocking task failed: {err}")))?
        .map_err(Into::into)
}
