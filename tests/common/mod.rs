//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_graphql::{Request, Variables};
use chrono::NaiveDate;
use serde_json::Value;

use catalog::AppState;
use catalog::config::Config;
use catalog::db::{AuthorRecord, BookRecord, CreateAuthor, CreateBook, Database};
use catalog::graphql::AuthUser;

pub const TEST_SECRET: &str = "integration-test-secret";

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Defaults from an empty environment, cheap bcrypt
pub fn test_config(require_auth: bool) -> Config {
    let mut config = Config::from_lookup(|_| None).unwrap();
    config.require_auth = require_auth;
    config.bcrypt_cost = 4;
    config
}

pub async fn test_db() -> Database {
    let db = Database::in_memory().await.unwrap();
    db.sync_schema().await.unwrap();
    db
}

pub async fn test_state(require_auth: bool) -> AppState {
    AppState::new(
        test_config(require_auth),
        test_db().await,
        TEST_SECRET.to_string(),
    )
}

pub fn test_user() -> AuthUser {
    AuthUser {
        user_id: "test-user".to_string(),
        username: "tester".to_string(),
    }
}

pub async fn seed_author(state: &AppState, name: &str, birth_date: NaiveDate) -> AuthorRecord {
    state
        .catalog
        .create_author(CreateAuthor {
            name: name.to_string(),
            birth_date,
        })
        .await
        .unwrap()
}

pub async fn seed_book(state: &AppState, title: &str, author_id: i64) -> BookRecord {
    state
        .catalog
        .create_book(CreateBook {
            title: title.to_string(),
            author_id,
            published_date: date(2020, 5, 1),
        })
        .await
        .unwrap()
}

/// Result of a GraphQL request as JSON: `data` plus the `extensions.code` of each error
pub struct GqlResponse {
    pub data: Value,
    pub error_codes: Vec<String>,
    pub error_messages: Vec<String>,
}

async fn run(state: &AppState, request: Request) -> GqlResponse {
    let response = state.schema.execute(request).await;

    let error_codes = response
        .errors
        .iter()
        .filter_map(|e| e.extensions.as_ref())
        .filter_map(|ext| ext.get("code"))
        .map(|code| code.to_string().trim_matches('"').to_string())
        .collect();
    let error_messages = response.errors.iter().map(|e| e.message.clone()).collect();

    GqlResponse {
        data: response.data.into_json().unwrap(),
        error_codes,
        error_messages,
    }
}

/// Execute as an anonymous client
pub async fn gql(state: &AppState, query: &str, variables: Value) -> GqlResponse {
    let request = Request::new(query).variables(Variables::from_json(variables));
    run(state, request).await
}

/// Execute as an authenticated client
pub async fn gql_as(state: &AppState, user: AuthUser, query: &str, variables: Value) -> GqlResponse {
    let request = Request::new(query)
        .variables(Variables::from_json(variables))
        .data(user);
    run(state, request).await
}
