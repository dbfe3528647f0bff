mod admin;
mod catalog;
mod student;

use axum::extract::DefaultBodyLimit;
use axum::routing::{post, put};
use axum::{Router, extract::State, http::StatusCode, routing::get};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::ScreenshotBackend;
use crate::error::AppError;
use crate::state::AppState;
use crate::validation::MAX_SCREENSHOT_BYTES;

/// Base64 inflates the screenshot by a third; leave room for the other fields.
const MAX_BODY_BYTES: usize = MAX_SCREENSHOT_BYTES * 4 / 3 + 64 * 1024;

pub fn router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/health", get(health))
        .route("/courses", get(catalog::list_courses))
        .route("/courses/events", get(catalog::course_events))
        .route("/courses/{id}", get(catalog::get_course))
        .route("/courses/{id}/quote", get(catalog::quote))
        .route("/suggestions", post(catalog::create_suggestion))
        .route("/registrations", post(student::submit_registration))
        .route("/me/registrations", get(student::my_registrations))
        .route("/admin/registrations", get(admin::list_registrations))
        .route("/admin/registrations/{id}/confirm", post(admin::confirm_registration))
        .route("/admin/courses", get(admin::list_courses).post(admin::create_course))
        .route(
            "/admin/courses/{id}",
            put(admin::update_course).delete(admin::delete_course),
        )
        .route("/admin/suggestions", get(admin::list_suggestions));

    if state.config.screenshot_backend == ScreenshotBackend::Disk {
        router = router.nest_service("/uploads", ServeDir::new(&state.config.upload_dir));
    }

    router
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}
