//! Tests for `AppError` -> HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values; no server or
//! database is needed.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use club_api::error::AppError;
use club_core::error::CoreError;
use http_body_util::BodyExt;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::not_found("Project", 42));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Project 42 not found");
}

#[tokio::test]
async fn invalid_input_returns_400() {
    let err = AppError::Core(CoreError::InvalidInput("member_ids must not be empty".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "member_ids must not be empty");
}

#[tokio::test]
async fn invalid_locator_returns_400() {
    let err = AppError::Core(CoreError::InvalidLocator("wrong bucket".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_LOCATOR");
}

#[tokio::test]
async fn conflict_error_returns_409() {
    let err = AppError::Core(CoreError::Conflict("toggled concurrently".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
}

#[tokio::test]
async fn attachment_failures_return_500_without_details() {
    for (err, code) in [
        (
            CoreError::AttachmentWriteFailed("s3: access denied for key".into()),
            "ATTACHMENT_WRITE_FAILED",
        ),
        (
            CoreError::AttachmentDeleteFailed("s3: timeout".into()),
            "ATTACHMENT_DELETE_FAILED",
        ),
    ] {
        let (status, json) = error_to_response(AppError::Core(err)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["code"], code);
        assert!(!json["error"].as_str().unwrap().contains("s3"));
    }
}

#[tokio::test]
async fn store_unavailable_returns_sanitized_500() {
    let err = AppError::Core(CoreError::StoreUnavailable("pool timed out".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn bad_request_error_returns_400() {
    let err = AppError::BadRequest("Missing required 'file' field".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "Missing required 'file' field");
}

#[tokio::test]
async fn row_not_found_returns_404() {
    let (status, json) = error_to_response(AppError::Database(sqlx::Error::RowNotFound)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn validation_errors_map_to_400() {
    let mut errors = validator::ValidationErrors::new();
    errors.add("email", validator::ValidationError::new("email"));

    let (status, json) = error_to_response(AppError::from(errors)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}
