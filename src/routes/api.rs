//! Student and course resource routes.

use crate::handlers::{assign_student, create_course, create_student, show_course, show_student};
use crate::state::AppState;
use axum::{routing::get, routing::post, Router};

pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/students", post(create_student))
        .route("/students/:id", get(show_student))
        .route("/courses", post(create_course))
        .route("/courses/:id", get(show_course))
        .route("/courses/:id/assign", post(assign_student))
        .with_state(state)
}
