//! Token issuance, profiles and admin gating through the full router.

#![allow(clippy::unwrap_used)]

use axum::http::{Method, StatusCode};
use pc_house_integration_tests::TestApp;
use serde_json::json;

#[tokio::test]
async fn test_root_and_request_id() {
    let app = TestApp::new();

    let response = app.get("/", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.ok());
    assert_eq!(response.text(), "PC House server is running");
    assert!(response.headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn test_get_jwt_is_an_idempotent_upsert() {
    let app = TestApp::new();

    let first = app.sign_in("u1", "Ann").await;
    let second = app
        .post("/get-jwt", None, json!({ "uid": "u1", "name": "Ann B" }))
        .await;
    assert_eq!(second.status, StatusCode::OK);
    assert!(!first.is_empty());

    let admin = app.sign_in_admin("root").await;
    let users = app.get("/get-users", Some(&admin)).await;
    let users = users.body["users"].as_array().unwrap();
    let ann: Vec<_> = users.iter().filter(|u| u["uid"] == "u1").collect();
    assert_eq!(ann.len(), 1);
    assert_eq!(ann[0]["name"], "Ann B");
    // The email from the first sign-in is kept
    assert_eq!(ann[0]["email"], "u1@example.com");
}

#[tokio::test]
async fn test_get_jwt_without_uid_is_rejected() {
    let app = TestApp::new();

    let response = app.post("/get-jwt", None, json!({ "name": "Nobody" })).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(!response.ok());
}

#[tokio::test]
async fn test_profile_round_trip() {
    let app = TestApp::new();
    let token = app.sign_in("u1", "Ann").await;

    let updated = app
        .patch(
            "/profile",
            Some(&token),
            json!({ "phone": "555-0101", "address": "2 Side St" }),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);

    let profile = app.get("/profile", Some(&token)).await;
    assert_eq!(profile.body["user"]["phone"], "555-0101");
    assert_eq!(profile.body["user"]["address"], "2 Side St");
    assert_eq!(profile.body["user"]["name"], "Ann");
}

#[tokio::test]
async fn test_profile_update_for_someone_else_is_forbidden() {
    let app = TestApp::new();
    let token = app.sign_in("u1", "Ann").await;
    app.sign_in("u2", "Bob").await;

    let response = app
        .patch("/profile", Some(&token), json!({ "uid": "u2", "name": "Mallory" }))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.text(), "forbidden access");
}

#[tokio::test]
async fn test_admin_routes_reject_without_side_effects() {
    let app = TestApp::new();
    let user = app.sign_in("u1", "Ann").await;
    app.sign_in("u2", "Bob").await;

    // Missing credential
    let response = app.send(Method::PUT, "/make-admin/u2", None, None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    // Invalid credential
    let response = app
        .send(Method::PUT, "/make-admin/u2", Some("not-a-token"), None)
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    // Valid credential, not an admin
    let response = app
        .send(Method::PUT, "/make-admin/u2", Some(&user), None)
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let check = app.get("/is-admin/u2", None).await;
    assert_eq!(check.body["admin"], false);
}

#[tokio::test]
async fn test_make_admin_promotes() {
    let app = TestApp::new();
    let admin = app.sign_in_admin("root").await;
    app.sign_in("u2", "Bob").await;

    let response = app
        .send(Method::PUT, "/make-admin/u2", Some(&admin), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let check = app.get("/is-admin/u2", None).await;
    assert_eq!(check.body["admin"], true);

    let unknown = app
        .send(Method::PUT, "/make-admin/ghost", Some(&admin), None)
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_is_admin_for_unknown_user_is_false() {
    let app = TestApp::new();

    let response = app.get("/is-admin/ghost", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["admin"], false);
}
