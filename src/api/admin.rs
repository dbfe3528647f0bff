use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use super::catalog::catalog_service;
use crate::auth::AdminSession;
use crate::db::repository;
use crate::error::AppError;
use crate::models::{
    CourseView, NewCourseRequest, Registration, RegistrationFilter, Suggestion,
    UpdateCourseRequest,
};
use crate::services::AdminService;
use crate::state::AppState;

#[derive(Deserialize)]
pub(super) struct RegistrationQueryParams {
    #[serde(default)]
    filter: RegistrationFilter,
    #[serde(default)]
    search: String,
}

pub(super) async fn list_registrations(
    State(state): State<AppState>,
    _admin: AdminSession,
    Query(params): Query<RegistrationQueryParams>,
) -> Result<Json<Vec<Registration>>, AppError> {
    let registrations = AdminService::new(state.db.clone())
        .registrations(params.filter, &params.search)
        .await?;
    Ok(Json(registrations))
}

pub(super) async fn confirm_registration(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    Path(id): Path<String>,
) -> Result<Json<Registration>, AppError> {
    let registration = AdminService::new(state.db.clone())
        .confirm(&id, admin.uid())
        .await?;
    Ok(Json(registration))
}

pub(super) async fn list_courses(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<Json<Vec<CourseView>>, AppError> {
    let courses = catalog_service(&state).list().await?;
    Ok(Json(courses))
}

pub(super) async fn create_course(
    State(state): State<AppState>,
    _admin: AdminSession,
    Json(req): Json<NewCourseRequest>,
) -> Result<(StatusCode, Json<CourseView>), AppError> {
    let course = catalog_service(&state).create(req).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

pub(super) async fn update_course(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
    Json(req): Json<UpdateCourseRequest>,
) -> Result<Json<CourseView>, AppError> {
    let course = catalog_service(&state).update(&id, req).await?;
    Ok(Json(course))
}

pub(super) async fn delete_course(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    catalog_service(&state).delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn list_suggestions(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<Json<Vec<Suggestion>>, AppError> {
    let suggestions = repository::fetch_suggestions(&state.db).await?;
    Ok(Json(suggestions))
}
