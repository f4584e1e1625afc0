//! REST route definitions
//!
//! The primary API is GraphQL at /graphql. The flat-record endpoints under
//! /api mirror the catalog for clients that prefer plain JSON.

pub mod authors;
pub mod books;
pub mod error;
pub mod health;

use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;

use crate::AppState;
use crate::db::sqlite_helpers::DATE_FORMAT;
use crate::graphql::handler::authenticate;
use crate::services::ValidationError;

use self::error::ApiError;

/// Catalog REST routes, writes guarded by the auth policy
pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(books::router())
        .merge(authors::router())
        .route_layer(middleware::from_fn_with_state(state, require_write_auth))
}

/// Reject unsafe methods without a valid bearer token when auth is required
async fn require_write_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if request.method().is_safe() || !state.config.require_auth {
        return next.run(request).await;
    }

    match authenticate(&state, request.headers()) {
        Some(user) => {
            tracing::debug!(user_id = %user.user_id, method = %request.method(), "REST write authorized");
            next.run(request).await
        }
        None => ApiError::Unauthorized.into_response(),
    }
}

/// Parse a `YYYY-MM-DD` field, recording a field error on failure
pub(crate) fn parse_date_field(
    errors: &mut ValidationError,
    field: &str,
    value: &str,
) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(value, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(_) => {
            errors.add(
                field,
                "Date has wrong format. Use one of these formats instead: YYYY-MM-DD.",
            );
            None
        }
    }
}
