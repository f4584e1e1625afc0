//! Flat-record REST endpoints for books
//!
//! Records are `{id, title, author, published_date}` where `author` is the
//! author's ID.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::db::{BookRecord, CreateBook, UpdateBook};
use crate::services::validation::{AUTHOR_EMPTY, FIELD_REQUIRED};
use crate::services::ValidationError;

const PK_TYPE: &str = "Incorrect type. Expected pk value, received str.";

use super::error::{ApiError, ApiResult};
use super::parse_date_field;

/// Book as exposed over REST
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRow {
    pub id: i64,
    pub title: String,
    pub author: i64,
    pub published_date: NaiveDate,
}

impl From<BookRecord> for BookRow {
    fn from(r: BookRecord) -> Self {
        Self {
            id: r.id,
            title: r.title,
            author: r.author_id,
            published_date: r.published_date,
        }
    }
}

/// Author reference as sent by clients: a number or a numeric string
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AuthorRef {
    Id(i64),
    Text(String),
}

impl AuthorRef {
    /// Resolve to an author ID, recording a field error when empty or not numeric
    fn resolve(&self, errors: &mut ValidationError) -> Option<i64> {
        match self {
            AuthorRef::Id(id) => Some(*id),
            AuthorRef::Text(text) if text.trim().is_empty() => {
                errors.add("author", AUTHOR_EMPTY);
                None
            }
            AuthorRef::Text(text) => match text.trim().parse() {
                Ok(id) => Some(id),
                Err(_) => {
                    errors.add("author", PK_TYPE);
                    None
                }
            },
        }
    }
}

/// Request body for create/replace/patch. `id` is read-only and ignored.
#[derive(Debug, Default, Deserialize)]
pub struct BookPayload {
    pub title: Option<String>,
    pub author: Option<AuthorRef>,
    pub published_date: Option<String>,
}

impl BookPayload {
    /// Every field present; used by POST and PUT
    fn into_create(self) -> Result<CreateBook, ValidationError> {
        let mut errors = ValidationError::new();

        if self.title.is_none() {
            errors.add("title", FIELD_REQUIRED);
        }
        let author = match &self.author {
            Some(author) => author.resolve(&mut errors),
            None => {
                errors.add("author", AUTHOR_EMPTY);
                None
            }
        };
        let published_date = match self.published_date.as_deref() {
            Some(value) => parse_date_field(&mut errors, "published_date", value),
            None => {
                errors.add("published_date", FIELD_REQUIRED);
                None
            }
        };

        match (self.title, author, published_date) {
            (Some(title), Some(author_id), Some(published_date)) if errors.is_empty() => {
                Ok(CreateBook {
                    title,
                    author_id,
                    published_date,
                })
            }
            _ => Err(errors),
        }
    }

    /// Only the fields present; used by PATCH
    fn into_update(self) -> Result<UpdateBook, ValidationError> {
        let mut errors = ValidationError::new();
        let author_id = self
            .author
            .as_ref()
            .and_then(|author| author.resolve(&mut errors));
        let published_date = self
            .published_date
            .as_deref()
            .and_then(|value| parse_date_field(&mut errors, "published_date", value));

        errors.into_result()?;
        Ok(UpdateBook {
            title: self.title,
            author_id,
            published_date,
        })
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/books", get(list_books).post(create_book))
        .route(
            "/books/{id}",
            get(get_book)
                .put(replace_book)
                .patch(update_book)
                .delete(delete_book),
        )
}

async fn list_books(State(state): State<AppState>) -> ApiResult<Json<Vec<BookRow>>> {
    let records = state.catalog.list_books().await?;
    Ok(Json(records.into_iter().map(BookRow::from).collect()))
}

async fn get_book(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<BookRow>> {
    let record = state.catalog.get_book(id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(record.into()))
}

async fn create_book(
    State(state): State<AppState>,
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<BookRow>)> {
    let Json(payload) = payload?;
    let input = payload.into_create()?;

    let record = state.catalog.create_book(input).await?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

async fn replace_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> ApiResult<Json<BookRow>> {
    let Json(payload) = payload?;
    let input = payload.into_create()?;

    let update = UpdateBook {
        title: Some(input.title),
        author_id: Some(input.author_id),
        published_date: Some(input.published_date),
    };
    let record = state.catalog.update_book(id, update).await?;
    Ok(Json(record.into()))
}

async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> ApiResult<Json<BookRow>> {
    let Json(payload) = payload?;
    let input = payload.into_update()?;

    let record = state.catalog.update_book(id, input).await?;
    Ok(Json(record.into()))
}

async fn delete_book(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    if state.catalog.delete_book(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn payload(title: Option<&str>, author: Option<i64>, date: Option<&str>) -> BookPayload {
        BookPayload {
            title: title.map(str::to_string),
            author: author.map(AuthorRef::Id),
            published_date: date.map(str::to_string),
        }
    }

    #[test]
    fn test_complete_payload() {
        let input = payload(Some("T"), Some(1), Some("2020-05-01"))
            .into_create()
            .unwrap();
        assert_eq!(input.title, "T");
        assert_eq!(input.author_id, 1);
        assert_eq!(input.published_date, NaiveDate::from_ymd_opt(2020, 5, 1).unwrap());
    }

    #[test]
    fn test_missing_fields_reported_together() {
        let err = payload(None, None, None).into_create().unwrap_err();
        assert_eq!(err.fields()["title"], vec![FIELD_REQUIRED.to_string()]);
        assert_eq!(err.fields()["author"], vec![AUTHOR_EMPTY.to_string()]);
        assert_eq!(err.fields()["published_date"], vec![FIELD_REQUIRED.to_string()]);
    }

    #[test]
    fn test_author_accepts_numeric_string() {
        let body = r#"{"title": "T", "author": " 4 ", "published_date": "2020-05-01"}"#;
        let payload: BookPayload = serde_json::from_str(body).unwrap();
        assert_eq!(payload.into_create().unwrap().author_id, 4);
    }

    #[test]
    fn test_blank_or_non_numeric_author() {
        let body = r#"{"title": "T", "author": "", "published_date": "2020-05-01"}"#;
        let payload: BookPayload = serde_json::from_str(body).unwrap();
        let err = payload.into_create().unwrap_err();
        assert_eq!(err.fields()["author"], vec![AUTHOR_EMPTY.to_string()]);

        let payload: BookPayload = serde_json::from_str(r#"{"author": "abc"}"#).unwrap();
        let err = payload.into_update().unwrap_err();
        assert_eq!(err.fields()["author"], vec![PK_TYPE.to_string()]);
    }

    #[test]
    fn test_bad_date_rejected() {
        let err = payload(Some("T"), Some(1), Some("yesterday"))
            .into_create()
            .unwrap_err();
        assert!(err.fields().contains_key("published_date"));
    }

    #[test]
    fn test_partial_payload_keeps_absent_fields_unset() {
        let update = payload(Some("New"), None, None).into_update().unwrap();
        assert_eq!(update.title.as_deref(), Some("New"));
        assert_eq!(update.author_id, None);
        assert_eq!(update.published_date, None);
    }

    #[test]
    fn test_row_uses_author_id() {
        let row = BookRow::from(BookRecord {
            id: 3,
            title: "T".to_string(),
            author_id: 7,
            published_date: NaiveDate::from_ymd_opt(2020, 5, 1).unwrap(),
        });
        assert_eq!(
            serde_json::to_value(&row).unwrap(),
            serde_json::json!({
                "id": 3,
                "title": "T",
                "author": 7,
                "published_date": "2020-05-01"
            })
        );
    }
}
