//! Integration tests for the auth mutations and bearer handling on /graphql

mod common;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tower::ServiceExt;

use catalog::build_app;

use common::*;

const TOKEN_AUTH: &str = r#"
    mutation ($username: String!, $password: String!) {
        tokenAuth(username: $username, password: $password) {
            token refreshToken expiresIn tokenType payload { username }
        }
    }
"#;

const REFRESH: &str = r#"
    mutation ($refreshToken: String!) {
        refreshToken(refreshToken: $refreshToken) { token refreshToken payload { username } }
    }
"#;

async fn state_with_user() -> catalog::AppState {
    let state = test_state(true).await;
    state.auth.create_user("reader", "s3cret").await.unwrap();
    state
}

async fn login(state: &catalog::AppState) -> Value {
    let res = gql(
        state,
        TOKEN_AUTH,
        json!({ "username": "reader", "password": "s3cret" }),
    )
    .await;
    assert!(res.error_codes.is_empty(), "{:?}", res.error_messages);
    res.data["tokenAuth"].clone()
}

// ============================================================================
// Token Mutations
// ============================================================================

#[tokio::test]
async fn test_token_auth_issues_pair() {
    let state = state_with_user().await;

    let tokens = login(&state).await;
    assert_eq!(tokens["tokenType"], json!("Bearer"));
    assert_eq!(tokens["expiresIn"], json!(300));
    assert_eq!(tokens["payload"]["username"], json!("reader"));
    assert_ne!(tokens["token"], tokens["refreshToken"]);
}

#[tokio::test]
async fn test_token_auth_rejects_bad_credentials() {
    let state = state_with_user().await;

    let res = gql(
        &state,
        TOKEN_AUTH,
        json!({ "username": "reader", "password": "wrong" }),
    )
    .await;

    assert_eq!(res.error_codes, vec!["UNAUTHORIZED"]);
    assert_eq!(res.error_messages, vec!["Please enter valid credentials"]);
}

#[tokio::test]
async fn test_verify_token() {
    let state = state_with_user().await;
    let tokens = login(&state).await;

    let res = gql(
        &state,
        "mutation ($token: String!) { verifyToken(token: $token) { valid payload { username } } }",
        json!({ "token": tokens["token"] }),
    )
    .await;
    assert_eq!(
        res.data,
        json!({ "verifyToken": { "valid": true, "payload": { "username": "reader" } } })
    );

    let res = gql(
        &state,
        r#"mutation { verifyToken(token: "not-a-jwt") { valid } }"#,
        json!({}),
    )
    .await;
    assert_eq!(res.error_codes, vec!["UNAUTHORIZED"]);
}

#[tokio::test]
async fn test_refresh_token_rotates() {
    let state = state_with_user().await;
    let tokens = login(&state).await;

    let res = gql(&state, REFRESH, json!({ "refreshToken": tokens["refreshToken"] })).await;
    assert!(res.error_codes.is_empty());
    let refreshed = &res.data["refreshToken"];
    assert_eq!(refreshed["payload"]["username"], json!("reader"));
    assert_ne!(refreshed["refreshToken"], tokens["refreshToken"]);

    // Second use of the same refresh token fails
    let res = gql(&state, REFRESH, json!({ "refreshToken": tokens["refreshToken"] })).await;
    assert_eq!(res.error_codes, vec!["UNAUTHORIZED"]);
}

// ============================================================================
// HTTP Bearer Handling
// ============================================================================

async fn post_graphql(
    app: axum::Router,
    token: Option<&str>,
    query: &str,
    variables: Value,
) -> Value {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/graphql")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let body = json!({ "query": query, "variables": variables }).to_string();

    let response = app.oneshot(builder.body(Body::from(body)).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_bearer_token_unlocks_mutations() {
    let state = state_with_user().await;
    let tokens = login(&state).await;
    let token = tokens["token"].as_str().unwrap().to_string();

    let mutation = r#"mutation { createAuthor(name: "A. Author", birthDate: "1950-01-01") { name } }"#;

    let anonymous = post_graphql(build_app(state.clone()), None, mutation, json!({})).await;
    assert_eq!(anonymous["errors"][0]["extensions"]["code"], json!("UNAUTHORIZED"));

    let forged = post_graphql(build_app(state.clone()), Some("forged"), mutation, json!({})).await;
    assert_eq!(forged["errors"][0]["extensions"]["code"], json!("UNAUTHORIZED"));

    let authed = post_graphql(build_app(state.clone()), Some(&token), mutation, json!({})).await;
    assert_eq!(authed["data"], json!({ "createAuthor": { "name": "A. Author" } }));
    assert_eq!(state.catalog.list_authors().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_refresh_token_is_not_a_bearer_token() {
    let state = state_with_user().await;
    let tokens = login(&state).await;
    let refresh = tokens["refreshToken"].as_str().unwrap().to_string();

    let mutation = r#"mutation { createAuthor(name: "A", birthDate: "1950-01-01") { name } }"#;
    let res = post_graphql(build_app(state.clone()), Some(&refresh), mutation, json!({})).await;

    assert_eq!(res["errors"][0]["extensions"]["code"], json!("UNAUTHORIZED"));
    assert!(state.catalog.list_authors().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_graphiql_only_for_browsers() {
    let state = test_state(false).await;

    let response = build_app(state.clone())
        .oneshot(
            Request::builder()
                .uri("/graphql")
                .header(header::ACCEPT, "text/html")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = build_app(state)
        .oneshot(Request::builder().uri("/graphql").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
