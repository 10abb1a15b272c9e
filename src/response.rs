//! Standard response envelope helpers.

use crate::service::ValidationErrors;
use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct Success<T> {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub data: T,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ValidationErrors>,
}

impl ErrorBody {
    pub fn new(message: String) -> Self {
        ErrorBody {
            status: "error",
            message,
            errors: None,
        }
    }

    pub fn with_errors(message: String, errors: ValidationErrors) -> Self {
        ErrorBody {
            status: "error",
            message,
            errors: Some(errors),
        }
    }
}

/// 201 with a human-readable message alongside the created data.
pub fn success_created<T: Serialize>(message: &'static str, data: T) -> (StatusCode, Json<Success<T>>) {
    (
        StatusCode::CREATED,
        Json(Success {
            status: "success",
            message: Some(message),
            data,
        }),
    )
}

pub fn success_ok<T: Serialize>(data: T) -> (StatusCode, Json<Success<T>>) {
    (
        StatusCode::OK,
        Json(Success {
            status: "success",
            message: None,
            data,
        }),
    )
}
