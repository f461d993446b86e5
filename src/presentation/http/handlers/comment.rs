//! Comment Handlers

use axum::{
    extract::{Query, State},
    Json,
};

use crate::application::dto::request::{CommentActionQuery, CommentListQuery};
use crate::application::dto::response::{ApiResponse, CommentData, CommentListData};
use crate::domain::ActionType;
use crate::presentation::http::extractors::{CurrentUser, Viewer};
use crate::shared::error::AppError;
use crate::shared::validation::parse_id;
use crate::startup::AppState;

use super::action_type;

/// `POST /comment/action`
///
/// `action_type=1` posts `comment_text` and echoes the new comment;
/// `action_type=2` deletes `comment_id` and returns `comment: null`.
pub async fn action(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Query(query): Query<CommentActionQuery>,
) -> Result<Json<ApiResponse<CommentData>>, AppError> {
    let video_id = parse_id("video_id", query.video_id.as_deref())?;

    let comment = match action_type(query.action_type.as_deref())? {
        ActionType::Do => {
            let text = query.comment_text.as_deref().unwrap_or_default();
            Some(state.comments.add(user_id, video_id, text).await?)
        }
        ActionType::Undo => {
            let comment_id = parse_id("comment_id", query.comment_id.as_deref())?;
            state.comments.delete(user_id, video_id, comment_id).await?;
            None
        }
    };

    Ok(Json(ApiResponse::ok(CommentData { comment })))
}

/// `GET /comment/list?video_id=`
pub async fn list(
    State(state): State<AppState>,
    Viewer(viewer): Viewer,
    Query(query): Query<CommentListQuery>,
) -> Result<Json<ApiResponse<CommentListData>>, AppError> {
    let video_id = parse_id("video_id", query.video_id.as_deref())?;
    let comment_list = state.comments.list(viewer, video_id).await?;

    Ok(Json(ApiResponse::ok(CommentListData { comment_list })))
}
