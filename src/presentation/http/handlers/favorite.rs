//! Favorite Handlers

use axum::{
    extract::{Query, State},
    Json,
};

use crate::application::dto::request::{FavoriteActionQuery, UserQuery};
use crate::application::dto::response::{Ack, ApiResponse, VideoListData};
use crate::presentation::http::extractors::{CurrentUser, Viewer};
use crate::shared::error::AppError;
use crate::shared::validation::parse_id;
use crate::startup::AppState;

use super::action_type;

/// `POST /favorite/action?video_id=&action_type=`
pub async fn action(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Query(query): Query<FavoriteActionQuery>,
) -> Result<Json<ApiResponse<Ack>>, AppError> {
    let video_id = parse_id("video_id", query.video_id.as_deref())?;
    let action = action_type(query.action_type.as_deref())?;

    state.favorites.action(user_id, video_id, action).await?;

    Ok(Json(ApiResponse::ack()))
}

/// `GET /favorite/list?user_id=`
pub async fn list(
    State(state): State<AppState>,
    Viewer(viewer): Viewer,
    Query(query): Query<UserQuery>,
) -> Result<Json<ApiResponse<VideoListData>>, AppError> {
    let user_id = parse_id("user_id", query.user_id.as_deref())?;
    let video_list = state.favorites.list(viewer, user_id).await?;

    Ok(Json(ApiResponse::ok(VideoListData { video_list })))
}
