//! Typed errors and HTTP mapping.

use crate::response::ErrorBody;
use crate::service::ValidationErrors;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Message carried by every 422 response.
pub const INVALID_DATA: &str = "The given data was invalid.";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0}")]
    NotFound(String),
    #[error("{}", INVALID_DATA)]
    Validation(ValidationErrors),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("{0}")]
    Conflict(String),
}

impl AppError {
    /// True when the database rejected a write because of a UNIQUE constraint.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            AppError::Db(sqlx::Error::Database(db)) => db.is_unique_violation(),
            _ => false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Config(_) | AppError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict(_) => StatusCode::CONFLICT,
        };
        let body = match &self {
            AppError::Config(_) | AppError::Db(_) => {
                tracing::error!(error = %self, "request failed");
                ErrorBody::new("Server Error".to_string())
            }
            AppError::Validation(errors) => ErrorBody::with_errors(self.to_string(), errors.clone()),
            _ => ErrorBody::new(self.to_string()),
        };
        (status, Json(body)).into_response()
    }
}
