//! Error handling for the REST layer
//!
//! Field errors are returned as `{"field": ["message", ...]}` with status 400.
//! Every other error is `{"detail": "..."}`.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::services::{CatalogError, ValidationError};

/// Errors returned by REST handlers
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(ValidationError),

    #[error("Not found.")]
    NotFound,

    #[error("{0}")]
    BadRequest(String),

    #[error("Authentication credentials were not provided.")]
    Unauthorized,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Message used when a referenced primary key does not exist
pub fn invalid_pk_message(id: i64) -> String {
    format!("Invalid pk \"{}\" - object does not exist.", id)
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err)
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound { .. } => ApiError::NotFound,
            CatalogError::ReferenceNotFound { entity, id } => ApiError::Validation(
                ValidationError::single(&entity.to_string().to_lowercase(), invalid_pk_message(id)),
            ),
            CatalogError::Validation(v) => ApiError::Validation(v),
            CatalogError::Storage(e) => ApiError::Internal(e),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(fields) => (StatusCode::BAD_REQUEST, json!(fields)),
            ApiError::NotFound => (StatusCode::NOT_FOUND, json!({ "detail": "Not found." })),
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, json!({ "detail": message }))
            }
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                json!({ "detail": "Authentication credentials were not provided." }),
            ),
            ApiError::Internal(e) => {
                tracing::error!(error = ?e, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "detail": "A server error occurred." }),
                )
            }
        };

        tracing::debug!(status_code = %status.as_u16(), "Request error");
        (status, Json(body)).into_response()
    }
}
