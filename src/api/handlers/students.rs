//! Roster, per-student history, and name validation handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use super::run_blocking;
use crate::api::dto::ValidationParams;
use crate::app_state::AppState;
use crate::domain::GradeEvent;
use crate::error::{ErrorResponse, GradebookError};
use crate::service::GradebookService;

/// `GET /api/students` — Roster in file order.
///
/// # Errors
///
/// Returns [`GradebookError::Store`] if the roster cannot be read.
#[utoipa::path(
    get,
    path = "/api/students",
    tag = "Students",
    summary = "List students",
    description = "Returns the roster in file order. A missing roster file yields an empty list.",
    responses(
        (status = 200, description = "Roster", body = Vec<String>),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn list_students(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, GradebookError> {
    let roster = run_blocking(&state, GradebookService::roster).await?;
    Ok(Json(roster))
}

/// `GET /api/students/{name}` — Raw events for one student.
///
/// # Errors
///
/// Returns [`GradebookError::Store`] if the log cannot be read.
#[utoipa::path(
    get,
    path = "/api/students/{name}",
    tag = "Students",
    summary = "Student history",
    description = "Returns every stored event for the student in append order, unsorted and unaggregated.",
    params(
        ("name" = String, Path, description = "Student identifier"),
    ),
    responses(
        (status = 200, description = "Event history", body = Vec<GradeEvent>),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn student_history(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, GradebookError> {
    let events = run_blocking(&state, move |gradebook| gradebook.history(&name)).await?;
    Ok(Json(events))
}

/// `GET /api/validation?name=` — Checks that a name is on the roster.
///
/// # Errors
///
/// Returns [`GradebookError::UnknownStudent`] when the name is absent and
/// [`GradebookError::Store`] if the roster cannot be read.
#[utoipa::path(
    get,
    path = "/api/validation",
    tag = "Students",
    summary = "Validate student name",
    description = "Responds 200 with an empty body when the name is on the roster, 400 otherwise.",
    params(ValidationParams),
    responses(
        (status = 200, description = "Student is on the roster"),
        (status = 400, description = "There is no such student", body = ErrorResponse),
    )
)]
pub async fn validate_student(
    State(state): State<AppState>,
    Query(params): Query<ValidationParams>,
) -> Result<impl IntoResponse, GradebookError> {
    run_blocking(&state, move |gradebook| -> Result<(), GradebookError> {
        if gradebook.validate_student(&params.name)? {
            Ok(())
        } else {
            Err(GradebookError::UnknownStudent(params.name))
        }
    })
    .await?;
    Ok(StatusCode::OK)
}

/// Student routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/students", get(list_students))
        .route("/api/students/{name}", get(student_history))
        .route("/api/validation", get(validate_student))
}
