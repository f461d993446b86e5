//! Authentication API Tests

use axum::http::StatusCode;

use crate::common::{unique_username, TestApp};

/// Test user registration with valid data
#[tokio::test]
async fn test_register_returns_id_and_token() {
    let app = TestApp::new();
    let name = unique_username();

    let (status, json) = app
        .post(&format!("/register?username={}&password=secret123", name))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status_code"], 0);
    assert!(json["user_id"].as_i64().unwrap() > 0);
    assert!(!json["token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_register_duplicate_name_fails() {
    let app = TestApp::new();
    let name = unique_username();
    app.register(&name).await;

    let (status, json) = app
        .post(&format!("/register?username={}&password=other", name))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status_code"], 1);
    assert_eq!(json["error_code"], "ALREADY_EXISTS");
}

#[tokio::test]
async fn test_register_missing_password_fails() {
    let app = TestApp::new();

    let (_, json) = app.post("/register?username=someone").await;

    assert_eq!(json["status_code"], 1);
    assert_eq!(json["error_code"], "MISSING_FIELD");
    assert_eq!(json["status_msg"], "missing required field password");
}

#[tokio::test]
async fn test_register_overlong_name_fails() {
    let app = TestApp::new();
    let name = "n".repeat(33);

    let (_, json) = app
        .post(&format!("/register?username={}&password=secret", name))
        .await;

    assert_eq!(json["error_code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_login_returns_same_account() {
    let app = TestApp::new();
    let name = unique_username();
    let account = app.register(&name).await;

    let (_, json) = app
        .post(&format!("/login?username={}&password=secret123", name))
        .await;

    assert_eq!(json["status_code"], 0);
    assert_eq!(json["user_id"].as_i64().unwrap(), account.user_id);

    // The fresh token identifies the same caller.
    let token = json["token"].as_str().unwrap();
    let (status, json) = app.get_auth("/relation/friend/list", token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status_code"], 0);
}

#[tokio::test]
async fn test_login_wrong_password_fails() {
    let app = TestApp::new();
    let name = unique_username();
    app.register(&name).await;

    let (_, json) = app
        .post(&format!("/login?username={}&password=wrong", name))
        .await;

    assert_eq!(json["error_code"], "PASSWORD_INCORRECT");
}

#[tokio::test]
async fn test_login_unknown_user_fails() {
    let app = TestApp::new();

    let (_, json) = app.post("/login?username=nobody&password=secret").await;

    assert_eq!(json["error_code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let app = TestApp::new();

    let (status, json) = app.get("/relation/friend/list").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error_code"], "INVALID_TOKEN");

    let (status, _) = app.get_auth("/relation/friend/list", "garbage").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_accepted_from_query() {
    let app = TestApp::new();
    let account = app.register(&unique_username()).await;

    let (status, json) = app
        .get(&format!("/relation/friend/list?token={}", account.token))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status_code"], 0);
}

#[tokio::test]
async fn test_user_profile_for_self() {
    let app = TestApp::new();
    let name = unique_username();
    let account = app.register(&name).await;

    let (_, json) = app
        .get_auth(&format!("/user?user_id={}", account.user_id), &account.token)
        .await;

    assert_eq!(json["status_code"], 0);
    assert_eq!(json["user"]["id"].as_i64().unwrap(), account.user_id);
    assert_eq!(json["user"]["name"], name.as_str());
    assert_eq!(json["user"]["is_follow"], false);
    assert_eq!(json["user"]["work_count"], 0);
}

#[tokio::test]
async fn test_user_profile_unknown_id() {
    let app = TestApp::new();

    let (_, json) = app.get("/user?user_id=42").await;
    assert_eq!(json["error_code"], "NOT_FOUND");

    let (_, json) = app.get("/user?user_id=abc").await;
    assert_eq!(json["error_code"], "BAD_REQUEST");

    let (_, json) = app.get("/user").await;
    assert_eq!(json["error_code"], "MISSING_FIELD");
}
