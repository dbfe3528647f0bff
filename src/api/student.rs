use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use super::catalog::registration_service;
use crate::auth::StudentSession;
use crate::error::AppError;
use crate::models::{NewRegistrationRequest, Registration, StudentDashboard};
use crate::state::AppState;

pub(super) async fn submit_registration(
    State(state): State<AppState>,
    StudentSession(session): StudentSession,
    Json(req): Json<NewRegistrationRequest>,
) -> Result<(StatusCode, Json<Registration>), AppError> {
    let registration = registration_service(&state).submit(&session, req).await?;
    Ok((StatusCode::CREATED, Json(registration)))
}

pub(super) async fn my_registrations(
    State(state): State<AppState>,
    StudentSession(session): StudentSession,
) -> Result<Json<StudentDashboard>, AppError> {
    let dashboard = registration_service(&state).dashboard(&session).await?;
    Ok(Json(dashboard))
}
