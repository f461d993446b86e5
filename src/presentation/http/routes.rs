//! Route Configuration
//!
//! Configures all HTTP routes for the API.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use super::handlers;
use crate::application::services::{COVER_URL_PREFIX, VIDEO_URL_PREFIX};
use crate::presentation::middleware::logging::track_http_metrics;
use crate::presentation::middleware::{auth_middleware, optional_auth_middleware};
use crate::startup::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    let media = &state.settings.media;
    let video_dir = ServeDir::new(media.video_path());
    let cover_dir = ServeDir::new(media.cover_path());

    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .merge(viewer_routes(state.clone()))
        .merge(protected_routes(state.clone()))
        // Health check endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::liveness))
        .route("/health/ready", get(handlers::health::readiness))
        // Prometheus metrics endpoint
        .route("/metrics", get(handlers::health::metrics_handler))
        .route_layer(middleware::from_fn(track_http_metrics))
        // Uploaded media
        .nest_service(VIDEO_URL_PREFIX, video_dir)
        .nest_service(COVER_URL_PREFIX, cover_dir)
        .with_state(state)
}

/// Routes readable anonymously; a valid token personalizes `is_follow` /
/// `is_favorite`. `/publish` also accepts its token as a form field, so the
/// handler enforces authentication itself.
fn viewer_routes(state: AppState) -> Router<AppState> {
    let upload_limit = DefaultBodyLimit::max(state.settings.media.max_upload_bytes);

    Router::new()
        .route("/feed", get(handlers::feed::feed))
        .route("/user", get(handlers::user::get_user))
        .route(
            "/publish",
            post(handlers::publish::publish).layer(upload_limit),
        )
        .route("/publish/list", get(handlers::feed::publish_list))
        .route("/favorite/list", get(handlers::favorite::list))
        .route("/comment/list", get(handlers::comment::list))
        .route("/relation/follow/list", get(handlers::relation::follow_list))
        .route(
            "/relation/follower/list",
            get(handlers::relation::follower_list),
        )
        .route_layer(middleware::from_fn_with_state(
            state,
            optional_auth_middleware,
        ))
}

/// Routes that act on behalf of the caller (protected)
fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/favorite/action", post(handlers::favorite::action))
        .route("/comment/action", post(handlers::comment::action))
        .route("/relation/action", post(handlers::relation::action))
        .route("/relation/friend/list", get(handlers::relation::friend_list))
        .route("/message/action", post(handlers::message::action))
        .route("/message/chat", get(handlers::message::chat))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
