//! Course handlers: create, show, assign a student.

use crate::error::AppError;
use crate::extractors::JsonPayload;
use crate::model::CourseCreated;
use crate::response::{success_created, success_ok};
use crate::service::CourseService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

pub async fn create_course(
    State(state): State<AppState>,
    JsonPayload(body): JsonPayload,
) -> Result<impl IntoResponse, AppError> {
    let course = CourseService::create(state.store.as_ref(), &body).await?;
    Ok(success_created("Course created successfully", CourseCreated::from(course)))
}

pub async fn show_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let course = CourseService::show(state.store.as_ref(), &id).await?;
    Ok(success_ok(course))
}

/// The course is resolved before the body is looked at, so an unknown course is a 404
/// whatever the payload contains.
pub async fn assign_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonPayload(body): JsonPayload,
) -> Result<impl IntoResponse, AppError> {
    let assignment = CourseService::assign(state.store.as_ref(), &id, &body).await?;
    Ok(success_created("Student added to course successfully", assignment))
}
