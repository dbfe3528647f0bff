use std::convert::Infallible;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_util::stream::Stream;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tracing::warn;
use validator::Validate;

use crate::db::repository;
use crate::error::AppError;
use crate::models::{CourseView, NewSuggestionRequest, Suggestion};
use crate::services::{CatalogService, Quote, RegistrationService};
use crate::state::AppState;

pub(super) fn catalog_service(state: &AppState) -> CatalogService {
    CatalogService::new(state.db.clone(), state.catalog_events.clone())
}

pub(super) fn registration_service(state: &AppState) -> RegistrationService {
    RegistrationService::new(
        state.db.clone(),
        state.screenshots.clone(),
        Some(state.config.upi_id.clone()),
        state.config.bundle_whatsapp_link.clone(),
    )
}

pub(super) async fn list_courses(
    State(state): State<AppState>,
) -> Result<Json<Vec<CourseView>>, AppError> {
    let courses = catalog_service(&state).list().await?;
    Ok(Json(courses))
}

pub(super) async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CourseView>, AppError> {
    let course = catalog_service(&state).get(&id).await?;
    Ok(Json(course))
}

pub(super) async fn quote(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Quote>, AppError> {
    let quote = registration_service(&state).quote(&id).await?;
    Ok(Json(quote))
}

/// Pushes course changes until the client disconnects.
pub(super) async fn course_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = BroadcastStream::new(state.catalog_events.subscribe()).filter_map(|msg| {
        match msg {
            Ok(event) => Event::default().json_data(&event).ok().map(Ok),
            Err(lagged) => {
                warn!("catalog subscriber fell behind: {}", lagged);
                None
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

pub(super) async fn create_suggestion(
    State(state): State<AppState>,
    Json(req): Json<NewSuggestionRequest>,
) -> Result<(StatusCode, Json<Suggestion>), AppError> {
    req.validate()?;
    let suggestion = repository::insert_suggestion(&state.db, &req).await?;
    Ok((StatusCode::CREATED, Json(suggestion)))
}
