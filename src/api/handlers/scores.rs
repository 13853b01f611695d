//! Aggregated read views: score table, grouped events, CSV export.

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use super::run_blocking;
use crate::api::export::score_table_csv;
use crate::app_state::AppState;
use crate::domain::{ScoreTable, StudentEvents};
use crate::error::{ErrorResponse, GradebookError};
use crate::service::GradebookService;

/// `GET /` — Best score per lab for every roster student.
///
/// # Errors
///
/// Returns [`GradebookError::Store`] if the log or roster cannot be read.
#[utoipa::path(
    get,
    path = "/",
    tag = "Scores",
    summary = "Score table",
    description = "Returns the highest lab number recorded and, for each roster student with events, the best bonus points per lab.",
    responses(
        (status = 200, description = "Score table", body = ScoreTable),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn score_table(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, GradebookError> {
    let table = run_blocking(&state, GradebookService::score_table).await?;
    Ok(Json(table))
}

/// `GET /events` — Roster students with their events, oldest first.
///
/// # Errors
///
/// Returns [`GradebookError::Store`] if the log or roster cannot be read.
#[utoipa::path(
    get,
    path = "/events",
    tag = "Scores",
    summary = "Grouped events",
    description = "Returns every roster student's events in chronological order, in roster order.",
    responses(
        (status = 200, description = "Grouped events", body = Vec<StudentEvents>),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn grouped_events(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, GradebookError> {
    let groups = run_blocking(&state, GradebookService::grouped_events).await?;
    Ok(Json(groups))
}

/// `GET /csv` — Score table as CSV.
///
/// # Errors
///
/// Returns [`GradebookError::Store`] if the log or roster cannot be read.
#[utoipa::path(
    get,
    path = "/csv",
    tag = "Scores",
    summary = "Score table CSV export",
    description = "Returns one row per roster student and one column per lab; labs without a score are empty cells.",
    responses(
        (status = 200, description = "CSV export", body = String, content_type = "text/csv"),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn score_table_export(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, GradebookError> {
    let table = run_blocking(&state, GradebookService::score_table).await?;
    Ok((
        [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
        score_table_csv(&table),
    ))
}

/// Score routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(score_table))
        .route("/index", get(score_table))
        .route("/events", get(grouped_events))
        .route("/csv", get(score_table_export))
}
