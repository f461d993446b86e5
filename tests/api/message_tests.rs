//! Message and Friend List API Tests

use axum::http::StatusCode;

use crate::common::{unique_username, Account, TestApp};

async fn send(app: &TestApp, from: &Account, to: &Account, content: &str) {
    let (_, json) = app
        .post_auth(
            &format!(
                "/message/action?to_user_id={}&action_type=1&content={}",
                to.user_id, content
            ),
            &from.token,
        )
        .await;
    assert_eq!(json["status_code"], 0, "{}", json);
}

#[tokio::test]
async fn test_chat_returns_both_directions_in_order() {
    let app = TestApp::new();
    let alice = app.register(&unique_username()).await;
    let bob = app.register(&unique_username()).await;
    send(&app, &alice, &bob, "hi").await;
    send(&app, &bob, &alice, "yo").await;

    let (_, json) = app
        .get_auth(
            &format!("/message/chat?to_user_id={}&pre_msg_time=0", bob.user_id),
            &alice.token,
        )
        .await;

    let list = json["message_list"].as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["content"], "hi");
    assert_eq!(list[0]["from_user_id"].as_i64().unwrap(), alice.user_id);
    assert_eq!(list[1]["content"], "yo");
    assert_eq!(list[1]["to_user_id"].as_i64().unwrap(), alice.user_id);
}

#[tokio::test]
async fn test_chat_only_returns_newer_messages() {
    let app = TestApp::new();
    let alice = app.register(&unique_username()).await;
    let bob = app.register(&unique_username()).await;
    send(&app, &alice, &bob, "first").await;

    let chat = |after: i64| {
        format!(
            "/message/chat?to_user_id={}&pre_msg_time={}",
            bob.user_id, after
        )
    };

    let (_, json) = app.get_auth(&chat(0), &alice.token).await;
    let sent_at = json["message_list"][0]["create_time"].as_i64().unwrap();

    let (_, json) = app.get_auth(&chat(sent_at), &alice.token).await;
    assert!(json["message_list"].as_array().unwrap().is_empty());

    let (_, json) = app.get_auth(&chat(sent_at - 1), &alice.token).await;
    assert_eq!(json["message_list"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_friend_list_reports_latest_message() {
    let app = TestApp::new();
    let alice = app.register(&unique_username()).await;
    let bob = app.register(&unique_username()).await;
    let carol = app.register(&unique_username()).await;
    send(&app, &alice, &bob, "hi").await;
    send(&app, &bob, &alice, "yo").await;
    send(&app, &alice, &carol, "hey").await;

    let (_, json) = app.get_auth("/relation/friend/list", &alice.token).await;
    let list = json["user_list"].as_array().unwrap();
    assert_eq!(list.len(), 2);

    // Newest conversation first.
    assert_eq!(list[0]["id"].as_i64().unwrap(), carol.user_id);
    assert_eq!(list[0]["message"], "hey");
    assert_eq!(list[0]["msgType"], 1);
    assert_eq!(list[1]["id"].as_i64().unwrap(), bob.user_id);
    assert_eq!(list[1]["message"], "yo");
    assert_eq!(list[1]["msgType"], 0);

    let (_, json) = app.get_auth("/relation/friend/list", &bob.token).await;
    let list = json["user_list"].as_array().unwrap();
    assert_eq!(list.len(), 1);
    // Bob sent the latest message of that conversation.
    assert_eq!(list[0]["msgType"], 1);
}

#[tokio::test]
async fn test_message_validation() {
    let app = TestApp::new();
    let alice = app.register(&unique_username()).await;
    let bob = app.register(&unique_username()).await;

    let (_, json) = app
        .post_auth(
            &format!(
                "/message/action?to_user_id={}&action_type=2&content=hi",
                bob.user_id
            ),
            &alice.token,
        )
        .await;
    assert_eq!(json["error_code"], "BAD_REQUEST");

    let (_, json) = app
        .post_auth(
            &format!("/message/action?to_user_id={}&action_type=1", bob.user_id),
            &alice.token,
        )
        .await;
    assert_eq!(json["error_code"], "MISSING_FIELD");

    let (_, json) = app
        .post_auth(
            "/message/action?to_user_id=404&action_type=1&content=hi",
            &alice.token,
        )
        .await;
    assert_eq!(json["error_code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_chat_requires_token() {
    let app = TestApp::new();

    let (status, _) = app.get("/message/chat?to_user_id=1").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
