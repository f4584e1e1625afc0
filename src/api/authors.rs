//! Flat-record REST endpoints for authors

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::db::{AuthorRecord, CreateAuthor, UpdateAuthor};
use crate::services::ValidationError;
use crate::services::validation::FIELD_REQUIRED;

use super::error::{ApiError, ApiResult};
use super::parse_date_field;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRow {
    pub id: i64,
    pub name: String,
    pub birth_date: NaiveDate,
}

impl From<AuthorRecord> for AuthorRow {
    fn from(r: AuthorRecord) -> Self {
        Self {
            id: r.id,
            name: r.name,
            birth_date: r.birth_date,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AuthorPayload {
    pub name: Option<String>,
    pub birth_date: Option<String>,
}

impl AuthorPayload {
    fn into_create(self) -> Result<CreateAuthor, ValidationError> {
        let mut errors = ValidationError::new();

        if self.name.is_none() {
            errors.add("name", FIELD_REQUIRED);
        }
        let birth_date = match self.birth_date.as_deref() {
            Some(value) => parse_date_field(&mut errors, "birth_date", value),
            None => {
                errors.add("birth_date", FIELD_REQUIRED);
                None
            }
        };

        match (self.name, birth_date) {
            (Some(name), Some(birth_date)) if errors.is_empty() => {
                Ok(CreateAuthor { name, birth_date })
            }
            _ => Err(errors),
        }
    }

    fn into_update(self) -> Result<UpdateAuthor, ValidationError> {
        let mut errors = ValidationError::new();
        let birth_date = self
            .birth_date
            .as_deref()
            .and_then(|value| parse_date_field(&mut errors, "birth_date", value));

        errors.into_result()?;
        Ok(UpdateAuthor {
            name: self.name,
            birth_date,
        })
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/authors", get(list_authors).post(create_author))
        .route(
            "/authors/{id}",
            get(get_author)
                .put(replace_author)
                .patch(update_author)
                .delete(delete_author),
        )
}

async fn list_authors(State(state): State<AppState>) -> ApiResult<Json<Vec<AuthorRow>>> {
    let records = state.catalog.list_authors().await?;
    Ok(Json(records.into_iter().map(AuthorRow::from).collect()))
}

async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<AuthorRow>> {
    let record = state
        .catalog
        .get_author(id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(record.into()))
}

async fn create_author(
    State(state): State<AppState>,
    payload: Result<Json<AuthorPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<AuthorRow>)> {
    let Json(payload) = payload?;
    let record = state.catalog.create_author(payload.into_create()?).await?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

async fn replace_author(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<AuthorPayload>, JsonRejection>,
) -> ApiResult<Json<AuthorRow>> {
    let Json(payload) = payload?;
    let input = payload.into_create()?;

    let update = UpdateAuthor {
        name: Some(input.name),
        birth_date: Some(input.birth_date),
    };
    let record = state.catalog.update_author(id, update).await?;
    Ok(Json(record.into()))
}

async fn update_author(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<AuthorPayload>, JsonRejection>,
) -> ApiResult<Json<AuthorRow>> {
    let Json(payload) = payload?;
    let record = state.catalog.update_author(id, payload.into_update()?).await?;
    Ok(Json(record.into()))
}

/// Deleting an author also deletes their books
async fn delete_author(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    if state.catalog.delete_author(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}
