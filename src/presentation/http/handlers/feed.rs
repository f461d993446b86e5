//! Feed Handlers

use axum::{
    extract::{Query, State},
    Json,
};

use crate::application::dto::request::{FeedQuery, UserQuery};
use crate::application::dto::response::{ApiResponse, FeedPage, VideoListData};
use crate::presentation::http::extractors::Viewer;
use crate::shared::error::AppError;
use crate::shared::validation::{parse_id, parse_optional_i64};
use crate::startup::AppState;

/// `GET /feed?latest_time=`
pub async fn feed(
    State(state): State<AppState>,
    Viewer(viewer): Viewer,
    Query(query): Query<FeedQuery>,
) -> Result<Json<ApiResponse<FeedPage>>, AppError> {
    let latest = parse_optional_i64("latest_time", query.latest_time.as_deref())?;
    let page = state.feed.feed(viewer, latest).await?;

    Ok(Json(ApiResponse::ok(page)))
}

/// `GET /publish/list?user_id=`
pub async fn publish_list(
    State(state): State<AppState>,
    Viewer(viewer): Viewer,
    Query(query): Query<UserQuery>,
) -> Result<Json<ApiResponse<VideoListData>>, AppError> {
    let user_id = parse_id("user_id", query.user_id.as_deref())?;
    let video_list = state.feed.publish_list(viewer, user_id).await?;

    Ok(Json(ApiResponse::ok(VideoListData { video_list })))
}
