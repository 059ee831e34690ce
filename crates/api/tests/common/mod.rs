#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use club_api::config::{ServerConfig, StorageBackend, StorageConfig};
use club_api::router::build_app_router;
use club_api::state::AppState;
use club_core::locator::LocatorFormat;
use club_core::memory::MemoryAttachmentStore;
use club_storage::S3Settings;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

pub const PUBLIC_BASE: &str = "http://localhost:3000";
pub const MAX_UPLOAD_BYTES: usize = 1024;

/// Build a test `ServerConfig` with safe defaults and a small upload cap.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_upload_bytes: MAX_UPLOAD_BYTES,
        storage: StorageConfig {
            backend: StorageBackend::S3,
            bucket: "images".to_string(),
            public_base_url: PUBLIC_BASE.to_string(),
            local_root: "./storage".to_string(),
            s3: S3Settings::default(),
        },
    }
}

/// Router plus a handle on the in-memory attachment store behind it.
pub struct TestApp {
    pub router: Router,
    pub attachments: Arc<MemoryAttachmentStore>,
    pub locators: LocatorFormat,
}

impl TestApp {
    /// Store-relative path of a locator issued by this app.
    pub fn path_of(&self, locator: &str) -> String {
        self.locators.parse(locator).unwrap()
    }

    pub fn has_object(&self, locator: &str) -> bool {
        self.attachments.contains(&self.path_of(locator))
    }
}

/// Build the full application router with all middleware layers over the
/// given pool and an in-memory attachment store.
///
/// Uses the same `build_app_router` as `main.rs`, so tests exercise the
/// production middleware stack.
pub fn build_test_app(pool: PgPool) -> TestApp {
    let config = test_config();
    let locators = LocatorFormat::new(PUBLIC_BASE, "images").unwrap();
    let attachments = Arc::new(MemoryAttachmentStore::new(locators.clone()));

    let state = AppState::new(pool, config.clone(), attachments.clone(), locators.clone());
    TestApp {
        router: build_app_router(state, &config),
        attachments,
        locators,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: &TestApp, request: Request<Body>) -> Response {
    app.router.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &TestApp, uri: &str) -> Response {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn delete(app: &TestApp, uri: &str) -> Response {
    send(app, Request::delete(uri).body(Body::empty()).unwrap()).await
}

pub async fn post_empty(app: &TestApp, uri: &str) -> Response {
    send(app, Request::post(uri).body(Body::empty()).unwrap()).await
}

pub async fn send_json(
    app: &TestApp,
    method: &str,
    uri: &str,
    body: serde_json::Value,
) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: &TestApp, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, "POST", uri, body).await
}

pub async fn put_json(app: &TestApp, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, "PUT", uri, body).await
}

pub async fn patch_json(app: &TestApp, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, "PATCH", uri, body).await
}

const BOUNDARY: &str = "club-test-boundary";

/// A multipart part: `(name, content_type, bytes)`. Text fields use `None`.
pub type Part<'a> = (&'a str, Option<&'a str>, &'a [u8]);

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, content_type, bytes) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match content_type {
            Some(ct) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"upload\"\r\n\
                     Content-Type: {ct}\r\n\r\n"
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
            ),
        }
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn send_multipart(app: &TestApp, method: &str, uri: &str, parts: &[Part<'_>]) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    send(app, request).await
}

/// PUT a single image `file` part.
pub async fn put_image(app: &TestApp, uri: &str, content_type: &str, bytes: &[u8]) -> Response {
    send_multipart(app, "PUT", uri, &[("file", Some(content_type), bytes)]).await
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the status and return the JSON body.
pub async fn expect_json(response: Response, status: StatusCode) -> serde_json::Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Sign up a member through the API and return its id. The member is
/// left unapproved.
pub async fn create_pending_member(app: &TestApp, name: &str) -> String {
    let response = post_json(
        app,
        "/api/v1/members",
        serde_json::json!({
            "email": format!("{name}@club.dev"),
            "name": name,
        }),
    )
    .await;
    let json = expect_json(response, StatusCode::CREATED).await;
    json["data"]["id"].as_str().unwrap().to_string()
}

/// Sign up and approve a member through the API and return its id.
pub async fn create_member(app: &TestApp, name: &str) -> String {
    let id = create_pending_member(app, name).await;
    let response = patch_json(
        app,
        &format!("/api/v1/members/{id}/approval"),
        serde_json::json!({ "is_approved": true }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    id
}

/// Create a project through the API and return its id.
pub async fn create_project(app: &TestApp, name: &str, member_ids: &[&str]) -> i64 {
    let response = post_json(
        app,
        "/api/v1/projects",
        serde_json::json!({ "name": name, "member_ids": member_ids }),
    )
    .await;
    let json = expect_json(response, StatusCode::CREATED).await;
    json["data"]["id"].as_i64().unwrap()
}

/// Create a question through the API and return its id.
pub async fn create_question(app: &TestApp, name: &str) -> i64 {
    let response = post_json(
        app,
        "/api/v1/questions",
        serde_json::json!({ "question_name": name }),
    )
    .await;
    let json = expect_json(response, StatusCode::CREATED).await;
    json["data"]["id"].as_i64().unwrap()
}
