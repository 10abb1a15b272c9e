//! Student handlers: create, show.

use crate::error::AppError;
use crate::extractors::JsonPayload;
use crate::model::StudentCreated;
use crate::response::{success_created, success_ok};
use crate::service::StudentService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

pub async fn create_student(
    State(state): State<AppState>,
    JsonPayload(body): JsonPayload,
) -> Result<impl IntoResponse, AppError> {
    let student = StudentService::create(state.store.as_ref(), &body).await?;
    Ok(success_created("Student created successfully", StudentCreated::from(student)))
}

pub async fn show_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let student = StudentService::show(state.store.as_ref(), &id).await?;
    Ok(success_ok(student))
}
