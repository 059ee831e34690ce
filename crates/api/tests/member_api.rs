//! HTTP-level tests for member approval and record updates.

mod common;

use axum::http::StatusCode;
use common::{
    create_member, create_pending_member, create_project, expect_json, get, patch_json, post_json,
    put_json,
};
use sqlx::PgPool;

fn ids(json: &serde_json::Value) -> Vec<String> {
    json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_str().unwrap().to_string())
        .collect()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sign_up_cannot_self_approve(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(
        &app,
        "/api/v1/members",
        serde_json::json!({
            "email": "eager@club.dev",
            "name": "Eager",
            "is_approved": true,
        }),
    )
    .await;
    let json = expect_json(response, StatusCode::CREATED).await;
    assert_eq!(json["data"]["is_approved"], false);

    let listed = expect_json(get(&app, "/api/v1/members").await, StatusCode::OK).await;
    assert!(ids(&listed).is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_approval_flow(pool: PgPool) {
    let app = common::build_test_app(pool);
    let pending = create_pending_member(&app, "pending").await;
    let approved = create_member(&app, "approved").await;

    let queue = expect_json(get(&app, "/api/v1/members/unapproved").await, StatusCode::OK).await;
    assert_eq!(ids(&queue), vec![pending.clone()]);

    let response = patch_json(
        &app,
        &format!("/api/v1/members/{pending}/approval"),
        serde_json::json!({ "is_approved": true }),
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"]["is_approved"], true);

    let queue = expect_json(get(&app, "/api/v1/members/unapproved").await, StatusCode::OK).await;
    assert!(ids(&queue).is_empty());

    let mut listed = ids(&expect_json(get(&app, "/api/v1/members").await, StatusCode::OK).await);
    listed.sort();
    let mut expected = vec![pending, approved];
    expected.sort();
    assert_eq!(listed, expected);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_approving_unknown_member_is_not_found(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = patch_json(
        &app,
        "/api/v1/members/ghost/approval",
        serde_json::json!({ "is_approved": true }),
    )
    .await;
    let json = expect_json(response, StatusCode::NOT_FOUND).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_member_profile(pool: PgPool) {
    let app = common::build_test_app(pool);
    let id = create_member(&app, "writer").await;
    let uri = format!("/api/v1/members/{id}");

    let json = expect_json(
        put_json(&app, &uri, serde_json::json!({ "bio": "Systems nerd" })).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"]["bio"], "Systems nerd");
    assert_eq!(json["data"]["name"], "writer");

    let response = put_json(&app, &uri, serde_json::json!({ "name": "" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json(&app, "/api/v1/members/ghost", serde_json::json!({ "bio": "x" })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_project_fields(pool: PgPool) {
    let app = common::build_test_app(pool);
    let project = create_project(&app, "Compiler", &[]).await;
    let uri = format!("/api/v1/projects/{project}");

    let json = expect_json(
        put_json(
            &app,
            &uri,
            serde_json::json!({ "name": "Compiler v2", "github_url": "https://github.com/club/cc" }),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"]["name"], "Compiler v2");
    assert_eq!(json["data"]["github_url"], "https://github.com/club/cc");

    let response = put_json(&app, &uri, serde_json::json!({ "deploy_url": "not a url" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json(&app, "/api/v1/projects/9999", serde_json::json!({ "name": "x" })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_achievement_fields(pool: PgPool) {
    let app = common::build_test_app(pool);
    let created = expect_json(
        post_json(
            &app,
            "/api/v1/achievements",
            serde_json::json!({ "title": "Hackathon", "achieved_at": "2024-03-01T00:00:00Z" }),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let json = expect_json(
        put_json(
            &app,
            &format!("/api/v1/achievements/{id}"),
            serde_json::json!({ "achieved_at": "2024-04-15T12:00:00Z" }),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"]["title"], "Hackathon");
    assert_eq!(json["data"]["achieved_at"], "2024-04-15T12:00:00Z");
}
