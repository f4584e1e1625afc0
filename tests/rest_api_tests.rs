//! Integration tests for the REST flat-record surface and health endpoints

mod common;

use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tower::ServiceExt;

use catalog::{AppState, build_app};

use common::*;

async fn send(
    state: &AppState,
    method: Method,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = build_app(state.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn request(state: &AppState, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    send(state, method, uri, body, None).await
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let state = test_state(false).await;

    let (status, body) = request(&state, Method::GET, "/healthz", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("healthy"));

    let (status, body) = request(&state, Method::GET, "/readyz", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ready": true, "database": true }));
}

// ============================================================================
// Books
// ============================================================================

mod books {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_create_and_fetch_book() {
        let state = test_state(false).await;
        let author = seed_author(&state, "A. Author", date(1950, 1, 1)).await;

        let (status, created) = request(
            &state,
            Method::POST,
            "/api/books",
            Some(json!({ "title": "T", "author": author.id, "published_date": "2020-05-01" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["title"], json!("T"));
        assert_eq!(created["author"], json!(author.id));
        assert_eq!(created["published_date"], json!("2020-05-01"));

        let id = created["id"].as_i64().unwrap();
        let (status, fetched) = request(&state, Method::GET, &format!("/api/books/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);

        let (status, list) = request(&state, Method::GET, "/api/books", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list, json!([created]));
    }

    #[tokio::test]
    async fn test_empty_title_is_field_error() {
        let state = test_state(false).await;
        let author = seed_author(&state, "A. Author", date(1950, 1, 1)).await;

        let (status, body) = request(
            &state,
            Method::POST,
            "/api/books",
            Some(json!({ "title": "", "author": author.id, "published_date": "2020-05-01" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "title": ["Title cannot be empty."] }));
        assert!(state.catalog.list_books().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_author_is_field_error() {
        let state = test_state(false).await;

        let (status, body) = request(
            &state,
            Method::POST,
            "/api/books",
            Some(json!({ "title": "T", "author": null, "published_date": "2020-05-01" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "author": ["Author cannot be empty."] }));

        let (status, body) = request(
            &state,
            Method::POST,
            "/api/books",
            Some(json!({ "title": "T", "author": "", "published_date": "2020-05-01" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "author": ["Author cannot be empty."] }));
        assert!(state.catalog.list_books().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_author_is_field_error() {
        let state = test_state(false).await;

        let (status, body) = request(
            &state,
            Method::POST,
            "/api/books",
            Some(json!({ "title": "T", "author": 999, "published_date": "2020-05-01" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({ "author": ["Invalid pk \"999\" - object does not exist."] })
        );
    }

    #[tokio::test]
    async fn test_patch_and_put() {
        let state = test_state(false).await;
        let author = seed_author(&state, "A. Author", date(1950, 1, 1)).await;
        let book = seed_book(&state, "T", author.id).await;
        let uri = format!("/api/books/{}", book.id);

        let (status, patched) =
            request(&state, Method::PATCH, &uri, Some(json!({ "title": "Patched" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            patched,
            json!({
                "id": book.id,
                "title": "Patched",
                "author": author.id,
                "published_date": "2020-05-01"
            })
        );

        // PUT needs every field
        let (status, body) =
            request(&state, Method::PUT, &uri, Some(json!({ "title": "Only title" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["published_date"], json!(["This field is required."]));

        let (status, replaced) = request(
            &state,
            Method::PUT,
            &uri,
            Some(json!({ "title": "Replaced", "author": author.id, "published_date": "2001-02-03" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(replaced["title"], json!("Replaced"));
        assert_eq!(replaced["published_date"], json!("2001-02-03"));
    }

    #[tokio::test]
    async fn test_delete_book() {
        let state = test_state(false).await;
        let author = seed_author(&state, "A. Author", date(1950, 1, 1)).await;
        let book = seed_book(&state, "T", author.id).await;
        let uri = format!("/api/books/{}", book.id);

        let (status, _) = request(&state, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = request(&state, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "detail": "Not found." }));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let state = test_state(false).await;

        let (status, body) = request(
            &state,
            Method::POST,
            "/api/books",
            Some(json!({ "title": 5, "author": "x" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].is_string());
    }
}

// ============================================================================
// Authors
// ============================================================================

mod authors {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_author_lifecycle() {
        let state = test_state(false).await;

        let (status, created) = request(
            &state,
            Method::POST,
            "/api/authors",
            Some(json!({ "name": "A. Author", "birth_date": "1950-01-01" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_i64().unwrap();
        seed_book(&state, "T", id).await;

        let uri = format!("/api/authors/{}", id);
        let (status, patched) =
            request(&state, Method::PATCH, &uri, Some(json!({ "name": "B. Author" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            patched,
            json!({ "id": id, "name": "B. Author", "birth_date": "1950-01-01" })
        );

        let (status, _) = request(&state, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(state.catalog.list_books().await.unwrap().is_empty());

        let (status, _) = request(&state, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_bad_birth_date() {
        let state = test_state(false).await;

        let (status, body) = request(
            &state,
            Method::POST,
            "/api/authors",
            Some(json!({ "name": "A", "birth_date": "1 Jan 1950" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({ "birth_date": ["Date has wrong format. Use one of these formats instead: YYYY-MM-DD."] })
        );
    }
}

// ============================================================================
// Write Policy
// ============================================================================

mod write_policy {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_writes_need_token_when_required() {
        let state = test_state(true).await;
        state.auth.create_user("writer", "pw").await.unwrap();
        let tokens = state.auth.obtain_token("writer", "pw").await.unwrap();

        let body = json!({ "name": "A. Author", "birth_date": "1950-01-01" });

        let (status, response) =
            send(&state, Method::POST, "/api/authors", Some(body.clone()), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            response,
            json!({ "detail": "Authentication credentials were not provided." })
        );

        let (status, _) = send(
            &state,
            Method::POST,
            "/api/authors",
            Some(body),
            Some(&tokens.access_token),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        // Reads stay public
        let (status, list) = send(&state, Method::GET, "/api/authors", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().unwrap().len(), 1);
    }
}
