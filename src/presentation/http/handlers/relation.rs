//! Relation Handlers

use axum::{
    extract::{Query, State},
    Json,
};

use crate::application::dto::request::{RelationActionQuery, UserQuery};
use crate::application::dto::response::{Ack, ApiResponse, FriendListData, UserListData};
use crate::presentation::http::extractors::{CurrentUser, Viewer};
use crate::shared::error::AppError;
use crate::shared::validation::parse_id;
use crate::startup::AppState;

use super::action_type;

/// `POST /relation/action?to_user_id=&action_type=`
pub async fn action(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Query(query): Query<RelationActionQuery>,
) -> Result<Json<ApiResponse<Ack>>, AppError> {
    let to_user_id = parse_id("to_user_id", query.to_user_id.as_deref())?;
    let action = action_type(query.action_type.as_deref())?;

    state.relations.action(user_id, to_user_id, action).await?;

    Ok(Json(ApiResponse::ack()))
}

/// `GET /relation/follow/list?user_id=`
pub async fn follow_list(
    State(state): State<AppState>,
    Viewer(viewer): Viewer,
    Query(query): Query<UserQuery>,
) -> Result<Json<ApiResponse<UserListData>>, AppError> {
    let user_id = parse_id("user_id", query.user_id.as_deref())?;
    let user_list = state.relations.follow_list(viewer, user_id).await?;

    Ok(Json(ApiResponse::ok(UserListData { user_list })))
}

/// `GET /relation/follower/list?user_id=`
pub async fn follower_list(
    State(state): State<AppState>,
    Viewer(viewer): Viewer,
    Query(query): Query<UserQuery>,
) -> Result<Json<ApiResponse<UserListData>>, AppError> {
    let user_id = parse_id("user_id", query.user_id.as_deref())?;
    let user_list = state.relations.follower_list(viewer, user_id).await?;

    Ok(Json(ApiResponse::ok(UserListData { user_list })))
}

/// `GET /relation/friend/list`
///
/// Friends are the caller's conversation partners; `user_id` in the query
/// is ignored in favor of the token's identity.
pub async fn friend_list(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<ApiResponse<FriendListData>>, AppError> {
    let user_list = state.messages.friends(user_id).await?;

    Ok(Json(ApiResponse::ok(FriendListData { user_list })))
}
