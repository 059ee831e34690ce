//! HTTP-level tests for owner-bound images and the raw media endpoints.

mod common;

use axum::http::StatusCode;
use common::{
    create_member, create_project, delete, expect_json, get, put_image, send_multipart,
    MAX_UPLOAD_BYTES,
};
use sqlx::PgPool;

const PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake";

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_member_photo_replace_removes_previous(pool: PgPool) {
    let app = common::build_test_app(pool);
    let member = create_member(&app, "face").await;
    let uri = format!("/api/v1/members/{member}/photo");

    let first = expect_json(put_image(&app, &uri, "image/png", PNG).await, StatusCode::OK).await;
    let first_ref = first["data"]["attachment_ref"].as_str().unwrap().to_string();
    assert!(first_ref.starts_with(
        "http://localhost:3000/storage/v1/object/public/images/members/"
    ));
    assert!(first_ref.ends_with(".png"));
    assert!(first["data"]["previous_ref"].is_null());
    assert!(app.has_object(&first_ref));

    let second = expect_json(put_image(&app, &uri, "image/webp", PNG).await, StatusCode::OK).await;
    let second_ref = second["data"]["attachment_ref"].as_str().unwrap().to_string();
    assert_eq!(second["data"]["previous_ref"], first_ref.as_str());
    assert!(second["data"]["warnings"].as_array().unwrap().is_empty());
    assert!(app.has_object(&second_ref));
    assert!(!app.has_object(&first_ref));
    assert_eq!(app.attachments.len(), 1);

    let profile = expect_json(get(&app, &format!("/api/v1/members/{member}")).await, StatusCode::OK)
        .await;
    assert_eq!(profile["data"]["profile_photo"], second_ref.as_str());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_failed_old_delete_is_reported_as_warning(pool: PgPool) {
    let app = common::build_test_app(pool);
    let member = create_member(&app, "face").await;
    let uri = format!("/api/v1/members/{member}/photo");

    let first = expect_json(put_image(&app, &uri, "image/png", PNG).await, StatusCode::OK).await;
    let first_ref = first["data"]["attachment_ref"].as_str().unwrap().to_string();

    app.attachments.fail_removes(true);
    let second = expect_json(put_image(&app, &uri, "image/png", PNG).await, StatusCode::OK).await;

    let warnings = second["data"]["warnings"].as_array().unwrap();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0]["kind"], "previous_not_removed");
    assert_eq!(warnings[0]["locator"], first_ref.as_str());
    assert!(app.has_object(&first_ref));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_write_failure_keeps_existing_photo(pool: PgPool) {
    let app = common::build_test_app(pool);
    let member = create_member(&app, "face").await;
    let uri = format!("/api/v1/members/{member}/photo");

    let first = expect_json(put_image(&app, &uri, "image/png", PNG).await, StatusCode::OK).await;
    let first_ref = first["data"]["attachment_ref"].as_str().unwrap().to_string();

    app.attachments.fail_writes(true);
    let json = expect_json(
        put_image(&app, &uri, "image/png", PNG).await,
        StatusCode::INTERNAL_SERVER_ERROR,
    )
    .await;
    assert_eq!(json["code"], "ATTACHMENT_WRITE_FAILED");

    assert!(app.has_object(&first_ref));
    let profile = expect_json(get(&app, &format!("/api/v1/members/{member}")).await, StatusCode::OK)
        .await;
    assert_eq!(profile["data"]["profile_photo"], first_ref.as_str());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unreachable_store_is_internal_error(pool: PgPool) {
    let app = common::build_test_app(pool);
    let member = create_member(&app, "offline").await;
    let uri = format!("/api/v1/members/{member}/photo");

    app.attachments.set_offline(true);
    let json = expect_json(
        put_image(&app, &uri, "image/png", PNG).await,
        StatusCode::INTERNAL_SERVER_ERROR,
    )
    .await;
    assert_eq!(json["code"], "INTERNAL_ERROR");

    let profile = expect_json(get(&app, &format!("/api/v1/members/{member}")).await, StatusCode::OK)
        .await;
    assert!(profile["data"]["profile_photo"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_upload_rejects_bad_type_and_oversize(pool: PgPool) {
    let app = common::build_test_app(pool);
    let member = create_member(&app, "face").await;
    let uri = format!("/api/v1/members/{member}/photo");

    let json = expect_json(
        put_image(&app, &uri, "application/pdf", PNG).await,
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(json["code"], "VALIDATION_ERROR");

    let big = vec![0u8; MAX_UPLOAD_BYTES + 1];
    let json = expect_json(
        put_image(&app, &uri, "image/png", &big).await,
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(json["code"], "BAD_REQUEST");

    let json = expect_json(
        send_multipart(&app, "PUT", &uri, &[("note", None, "no file".as_bytes())]).await,
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(json["code"], "BAD_REQUEST");

    assert!(app.attachments.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_photo_for_unknown_member_is_not_found(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = put_image(&app, "/api/v1/members/nobody/photo", "image/png", PNG).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(app.attachments.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_clear_photo(pool: PgPool) {
    let app = common::build_test_app(pool);
    let member = create_member(&app, "face").await;
    let uri = format!("/api/v1/members/{member}/photo");

    let first = expect_json(put_image(&app, &uri, "image/gif", PNG).await, StatusCode::OK).await;
    let first_ref = first["data"]["attachment_ref"].as_str().unwrap().to_string();

    assert_eq!(delete(&app, &uri).await.status(), StatusCode::NO_CONTENT);
    assert!(!app.has_object(&first_ref));
    assert_eq!(delete(&app, &uri).await.status(), StatusCode::NOT_FOUND);

    let profile = expect_json(get(&app, &format!("/api/v1/members/{member}")).await, StatusCode::OK)
        .await;
    assert!(profile["data"]["profile_photo"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_destroying_project_deletes_image(pool: PgPool) {
    let app = common::build_test_app(pool);
    let project = create_project(&app, "Site", &[]).await;

    let image = expect_json(
        put_image(&app, &format!("/api/v1/projects/{project}/image"), "image/jpeg", PNG).await,
        StatusCode::OK,
    )
    .await;
    let image_ref = image["data"]["attachment_ref"].as_str().unwrap().to_string();
    assert!(app.path_of(&image_ref).starts_with("projects/"));
    assert!(image_ref.ends_with(".jpeg"));

    // The object cannot be removed: the project stays for a retry.
    app.attachments.fail_removes(true);
    let response = delete(&app, &format!("/api/v1/projects/{project}")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        get(&app, &format!("/api/v1/projects/{project}")).await.status(),
        StatusCode::OK
    );

    app.attachments.fail_removes(false);
    let response = delete(&app, &format!("/api/v1/projects/{project}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(app.attachments.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_raw_media_upload_and_delete(pool: PgPool) {
    let app = common::build_test_app(pool);

    let first = expect_json(
        send_multipart(
            &app,
            "POST",
            "/api/v1/media",
            &[
                ("owner_kind", None, "achievement".as_bytes()),
                ("owner_id", None, "3".as_bytes()),
                ("file", Some("image/png"), PNG),
            ],
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let first_ref = first["data"]["locator"].as_str().unwrap().to_string();
    assert!(first["data"]["path"].as_str().unwrap().starts_with("achievements/"));

    let second = expect_json(
        send_multipart(
            &app,
            "POST",
            "/api/v1/media",
            &[
                ("owner_kind", None, "achievement".as_bytes()),
                ("owner_id", None, "3".as_bytes()),
                ("folder", None, "gallery".as_bytes()),
                ("previous_ref", None, first_ref.as_bytes()),
                ("file", Some("image/png"), PNG),
            ],
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let second_ref = second["data"]["locator"].as_str().unwrap().to_string();
    assert!(second["data"]["path"].as_str().unwrap().starts_with("gallery/"));
    assert!(!app.has_object(&first_ref));
    assert!(app.has_object(&second_ref));

    let encoded: String = second_ref
        .bytes()
        .map(|b| match b {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' | b'.' => (b as char).to_string(),
            _ => format!("%{b:02X}"),
        })
        .collect();
    let response = delete(&app, &format!("/api/v1/media?ref={encoded}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(app.attachments.is_empty());

    let response = delete(&app, "/api/v1/media?ref=https%3A%2F%2Felsewhere.dev%2Fa.png").await;
    let json = expect_json(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(json["code"], "INVALID_LOCATOR");
}
