//! Health Check API Tests

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use tower::ServiceExt;

use crate::common::TestApp;

#[tokio::test]
async fn test_health_check_returns_ok() {
    let app = TestApp::new();

    let (status, json) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json.get("version").is_some());
}

#[tokio::test]
async fn test_liveness_probe() {
    let app = TestApp::new();

    let (status, json) = app.get("/health/live").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "alive");
}

#[tokio::test]
async fn test_readiness_degraded_without_media_dir() {
    let app = TestApp::new();

    let (status, json) = app.get("/health/ready").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["database"]["status"], "healthy");
    assert_eq!(json["checks"]["storage"]["status"], "degraded");
}

#[tokio::test]
async fn test_readiness_healthy_with_media_dir() {
    let app = TestApp::new();
    std::fs::create_dir_all(app.media_root.path().join("video")).unwrap();

    let (_, json) = app.get("/health/ready").await;

    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn test_metrics_exposition() {
    let app = TestApp::new();
    app.get("/health").await;

    let response = app
        .router
        .clone()
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("short_video_http_requests_total"));
}
