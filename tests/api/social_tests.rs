//! Follow, Favorite and Comment API Tests

use chrono::Utc;
use serde_json::Value;

use crate::common::{unique_username, Account, TestApp};

async fn profile(app: &TestApp, viewer: &Account, user_id: i64) -> Value {
    let (_, json) = app
        .get_auth(&format!("/user?user_id={}", user_id), &viewer.token)
        .await;
    assert_eq!(json["status_code"], 0, "{}", json);
    json["user"].clone()
}

// ============================================================================
// Relations
// ============================================================================

#[tokio::test]
async fn test_follow_updates_counters_once() {
    let app = TestApp::new();
    let alice = app.register(&unique_username()).await;
    let bob = app.register(&unique_username()).await;

    let uri = format!("/relation/action?to_user_id={}&action_type=1", bob.user_id);
    let (_, json) = app.post_auth(&uri, &alice.token).await;
    assert_eq!(json["status_code"], 0);

    // Following twice is rejected and leaves the counters alone.
    let (_, json) = app.post_auth(&uri, &alice.token).await;
    assert_eq!(json["error_code"], "ALREADY_EXISTS");

    let bob_view = profile(&app, &alice, bob.user_id).await;
    assert_eq!(bob_view["follower_count"], 1);
    assert_eq!(bob_view["is_follow"], true);

    let alice_view = profile(&app, &bob, alice.user_id).await;
    assert_eq!(alice_view["follow_count"], 1);
    assert_eq!(alice_view["is_follow"], false);
}

#[tokio::test]
async fn test_follow_and_follower_lists() {
    let app = TestApp::new();
    let alice = app.register(&unique_username()).await;
    let bob = app.register(&unique_username()).await;
    app.post_auth(
        &format!("/relation/action?to_user_id={}&action_type=1", bob.user_id),
        &alice.token,
    )
    .await;

    let (_, json) = app
        .get(&format!("/relation/follow/list?user_id={}", alice.user_id))
        .await;
    let list = json["user_list"].as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"].as_i64().unwrap(), bob.user_id);
    // Anonymous viewers never see is_follow.
    assert_eq!(list[0]["is_follow"], false);

    let (_, json) = app
        .get_auth(
            &format!("/relation/follower/list?user_id={}", bob.user_id),
            &bob.token,
        )
        .await;
    let list = json["user_list"].as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"].as_i64().unwrap(), alice.user_id);
}

#[tokio::test]
async fn test_unfollow() {
    let app = TestApp::new();
    let alice = app.register(&unique_username()).await;
    let bob = app.register(&unique_username()).await;

    let undo = format!("/relation/action?to_user_id={}&action_type=2", bob.user_id);
    let (_, json) = app.post_auth(&undo, &alice.token).await;
    assert_eq!(json["error_code"], "NOT_FOUND");

    app.post_auth(
        &format!("/relation/action?to_user_id={}&action_type=1", bob.user_id),
        &alice.token,
    )
    .await;
    let (_, json) = app.post_auth(&undo, &alice.token).await;
    assert_eq!(json["status_code"], 0);

    let bob_view = profile(&app, &alice, bob.user_id).await;
    assert_eq!(bob_view["follower_count"], 0);
    assert_eq!(bob_view["is_follow"], false);
}

#[tokio::test]
async fn test_follow_rejects_self_and_unknown_target() {
    let app = TestApp::new();
    let alice = app.register(&unique_username()).await;

    let (_, json) = app
        .post_auth(
            &format!("/relation/action?to_user_id={}&action_type=1", alice.user_id),
            &alice.token,
        )
        .await;
    assert_eq!(json["error_code"], "BAD_REQUEST");

    let (_, json) = app
        .post_auth("/relation/action?to_user_id=7&action_type=1", &alice.token)
        .await;
    assert_eq!(json["error_code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_action_type_validation() {
    let app = TestApp::new();
    let alice = app.register(&unique_username()).await;
    let bob = app.register(&unique_username()).await;

    let (_, json) = app
        .post_auth(
            &format!("/relation/action?to_user_id={}", bob.user_id),
            &alice.token,
        )
        .await;
    assert_eq!(json["error_code"], "MISSING_FIELD");

    let (_, json) = app
        .post_auth(
            &format!("/relation/action?to_user_id={}&action_type=3", bob.user_id),
            &alice.token,
        )
        .await;
    assert_eq!(json["error_code"], "BAD_REQUEST");
}

// ============================================================================
// Favorites
// ============================================================================

#[tokio::test]
async fn test_favorite_cascades_counters() {
    let app = TestApp::new();
    let author = app.register(&unique_username()).await;
    let fan = app.register(&unique_username()).await;
    app.store.seed_video(100, author.user_id, Utc::now());

    let like = "/favorite/action?video_id=100&action_type=1";
    let (_, json) = app.post_auth(like, &fan.token).await;
    assert_eq!(json["status_code"], 0);

    let (_, json) = app.post_auth(like, &fan.token).await;
    assert_eq!(json["error_code"], "ALREADY_EXISTS");

    assert_eq!(app.store.video(100).unwrap().favorite_count, 1);
    assert_eq!(app.store.user(author.user_id).unwrap().total_favorited, 1);
    assert_eq!(app.store.user(fan.user_id).unwrap().favorite_count, 1);

    let (_, json) = app
        .get_auth(&format!("/favorite/list?user_id={}", fan.user_id), &fan.token)
        .await;
    let list = json["video_list"].as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"], 100);
    assert_eq!(list[0]["is_favorite"], true);
    assert_eq!(list[0]["favorite_count"], 1);
    assert_eq!(list[0]["author"]["total_favorited"], 1);
}

#[tokio::test]
async fn test_unfavorite() {
    let app = TestApp::new();
    let author = app.register(&unique_username()).await;
    let fan = app.register(&unique_username()).await;
    app.store.seed_video(100, author.user_id, Utc::now());

    let unlike = "/favorite/action?video_id=100&action_type=2";
    let (_, json) = app.post_auth(unlike, &fan.token).await;
    assert_eq!(json["error_code"], "NOT_FOUND");

    app.post_auth("/favorite/action?video_id=100&action_type=1", &fan.token)
        .await;
    let (_, json) = app.post_auth(unlike, &fan.token).await;
    assert_eq!(json["status_code"], 0);

    assert_eq!(app.store.video(100).unwrap().favorite_count, 0);
    assert_eq!(app.store.user(author.user_id).unwrap().total_favorited, 0);
    assert_eq!(app.store.user(fan.user_id).unwrap().favorite_count, 0);

    let (_, json) = app
        .get(&format!("/favorite/list?user_id={}", fan.user_id))
        .await;
    assert!(json["video_list"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_favorite_unknown_video() {
    let app = TestApp::new();
    let fan = app.register(&unique_username()).await;

    let (_, json) = app
        .post_auth("/favorite/action?video_id=999&action_type=1", &fan.token)
        .await;

    assert_eq!(json["error_code"], "NOT_FOUND");
}

// ============================================================================
// Comments
// ============================================================================

#[tokio::test]
async fn test_comment_lifecycle() {
    let app = TestApp::new();
    let author = app.register(&unique_username()).await;
    let viewer = app.register(&unique_username()).await;
    app.store.seed_video(100, author.user_id, Utc::now());

    let (_, json) = app
        .post_auth(
            "/comment/action?video_id=100&action_type=1&comment_text=nice%20clip",
            &viewer.token,
        )
        .await;
    assert_eq!(json["status_code"], 0);
    let comment = &json["comment"];
    assert_eq!(comment["content"], "nice clip");
    assert_eq!(comment["user"]["id"].as_i64().unwrap(), viewer.user_id);
    assert_eq!(comment["create_date"].as_str().unwrap().len(), 5);
    let comment_id = comment["id"].as_i64().unwrap();
    assert_eq!(app.store.video(100).unwrap().comment_count, 1);

    let (_, json) = app.get("/comment/list?video_id=100").await;
    assert_eq!(json["comment_list"].as_array().unwrap().len(), 1);

    // Only the author may delete.
    let delete = format!(
        "/comment/action?video_id=100&action_type=2&comment_id={}",
        comment_id
    );
    let (_, json) = app.post_auth(&delete, &author.token).await;
    assert_eq!(json["error_code"], "FORBIDDEN");

    let (_, json) = app.post_auth(&delete, &viewer.token).await;
    assert_eq!(json["status_code"], 0);
    assert!(json["comment"].is_null());
    assert_eq!(app.store.video(100).unwrap().comment_count, 0);

    let (_, json) = app.get("/comment/list?video_id=100").await;
    assert!(json["comment_list"].as_array().unwrap().is_empty());

    let (_, json) = app.post_auth(&delete, &viewer.token).await;
    assert_eq!(json["error_code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_comment_validation() {
    let app = TestApp::new();
    let author = app.register(&unique_username()).await;
    app.store.seed_video(100, author.user_id, Utc::now());

    let (_, json) = app
        .post_auth(
            "/comment/action?video_id=100&action_type=1&comment_text=%20%20",
            &author.token,
        )
        .await;
    assert_eq!(json["error_code"], "MISSING_FIELD");

    let (_, json) = app
        .post_auth("/comment/action?video_id=100&action_type=2", &author.token)
        .await;
    assert_eq!(json["error_code"], "MISSING_FIELD");

    let (_, json) = app
        .post_auth(
            "/comment/action?video_id=555&action_type=1&comment_text=hi",
            &author.token,
        )
        .await;
    assert_eq!(json["error_code"], "NOT_FOUND");

    let (_, json) = app.get("/comment/list?video_id=555").await;
    assert_eq!(json["error_code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_comment_on_other_video_is_not_found() {
    let app = TestApp::new();
    let author = app.register(&unique_username()).await;
    app.store.seed_video(100, author.user_id, Utc::now());
    app.store.seed_video(101, author.user_id, Utc::now());

    let (_, json) = app
        .post_auth(
            "/comment/action?video_id=100&action_type=1&comment_text=hi",
            &author.token,
        )
        .await;
    let comment_id = json["comment"]["id"].as_i64().unwrap();

    let (_, json) = app
        .post_auth(
            &format!(
                "/comment/action?video_id=101&action_type=2&comment_id={}",
                comment_id
            ),
            &author.token,
        )
        .await;
    assert_eq!(json["error_code"], "NOT_FOUND");
    assert_eq!(app.store.video(100).unwrap().comment_count, 1);
}
