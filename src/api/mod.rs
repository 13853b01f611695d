//! HTTP layer: route handlers, DTOs, the admin guard, and CSV export.
//!
//! The routes mirror the course site: public score views at the root,
//! a small JSON API under `/api`, and basic-auth guarded admin routes.

pub mod auth;
pub mod dto;
pub mod export;
pub mod handlers;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::app_state::AppState;

/// OpenAPI description of every endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "lab-gradebook", description = "Lab grading event log and score views"),
    paths(
        handlers::scores::score_table,
        handlers::scores::grouped_events,
        handlers::scores::score_table_export,
        handlers::students::list_students,
        handlers::students::student_history,
        handlers::students::validate_student,
        handlers::admin::admin_overview,
        handlers::admin::submit_grade,
        handlers::system::health_handler,
    ),
    modifiers(&BasicAuthAddon),
    tags(
        (name = "Scores", description = "Aggregated score views"),
        (name = "Students", description = "Roster and raw history"),
        (name = "Admin", description = "Grade submission"),
        (name = "System", description = "Service health"),
    )
)]
pub struct ApiDoc;

/// Registers the `basic_auth` security scheme used by admin routes.
#[derive(Debug)]
struct BasicAuthAddon;

impl Modify for BasicAuthAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "basic_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Basic)),
            );
        }
    }
}

/// Builds the router with all endpoints; state is attached by the caller.
pub fn build_router(state: &AppState) -> Router<AppState> {
    let router = Router::new()
        .merge(handlers::routes(state))
        .merge(handlers::system::routes());

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    router
}

/// Builds the complete application with tracing and CORS layers.
pub fn build_app(state: AppState) -> Router {
    build_router(&state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
