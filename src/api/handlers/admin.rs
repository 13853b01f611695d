//! Admin handlers: overview and grade submission. Basic-auth guarded.

use axum::extract::State;
use axum::extract::rejection::FormRejection;
use axum::response::{IntoResponse, Redirect};
use axum::routing::{get, post};
use axum::{Form, Json, Router};

use super::run_blocking;
use crate::api::dto::{AdminOverview, SubmitForm};
use crate::app_state::AppState;
use crate::domain::grade_event::split_comment;
use crate::error::{ErrorResponse, GradebookError};

/// `GET /admin` — Roster and current lab count for the submission form.
///
/// # Errors
///
/// Returns [`GradebookError::Store`] if the roster or log cannot be read.
#[utoipa::path(
    get,
    path = "/admin",
    tag = "Admin",
    summary = "Admin overview",
    description = "Returns the roster and the highest lab number recorded. Requires basic auth.",
    responses(
        (status = 200, description = "Admin overview", body = AdminOverview),
        (status = 401, description = "Missing or wrong credentials", body = ErrorResponse),
    ),
    security(("basic_auth" = []))
)]
pub async fn admin_overview(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, GradebookError> {
    let overview = run_blocking(&state, |gradebook| -> Result<_, GradebookError> {
        Ok(AdminOverview {
            students: gradebook.roster()?,
            total_labs: gradebook.total_labs()?,
        })
    })
    .await?;
    Ok(Json(overview))
}

/// `POST /submit` — Record a graded lab submission.
///
/// Redirects back to `/admin` on success so the form can be reused.
///
/// # Errors
///
/// Returns [`GradebookError::InvalidRequest`] for a malformed form,
/// [`GradebookError::UnknownStudent`] when roster matching is enforced and
/// the name is absent, and [`GradebookError::Store`] if the append fails.
#[utoipa::path(
    post,
    path = "/submit",
    tag = "Admin",
    summary = "Submit a grade",
    description = "Appends a grading event stamped with the current UTC time. Comment text is split into lines; blank lines are dropped. Requires basic auth.",
    request_body(content = SubmitForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Recorded; redirects to /admin"),
        (status = 400, description = "Invalid form or unknown student", body = ErrorResponse),
        (status = 401, description = "Missing or wrong credentials", body = ErrorResponse),
    ),
    security(("basic_auth" = []))
)]
pub async fn submit_grade(
    State(state): State<AppState>,
    form: Result<Form<SubmitForm>, FormRejection>,
) -> Result<Redirect, GradebookError> {
    let Form(form) = form.map_err(|rejection| GradebookError::InvalidRequest(rejection.body_text()))?;
    let require_roster_match = state.require_roster_match;
    let comment = split_comment(&form.comment);

    run_blocking(&state, move |gradebook| -> Result<(), GradebookError> {
        if require_roster_match && !gradebook.validate_student(&form.name)? {
            return Err(GradebookError::UnknownStudent(form.name));
        }
        gradebook.record_event(&form.name, form.lab, form.bonus_points, &comment)?;
        Ok(())
    })
    .await?;

    Ok(Redirect::to("/admin"))
}

/// Admin routes. The caller attaches the auth guard.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin", get(admin_overview))
        .route("/submit", post(submit_grade))
}
