//! Message Handlers

use axum::{
    extract::{Query, State},
    Json,
};

use crate::application::dto::request::{ChatQuery, MessageActionQuery};
use crate::application::dto::response::{Ack, ApiResponse, MessageListData};
use crate::presentation::http::extractors::CurrentUser;
use crate::shared::error::AppError;
use crate::shared::validation::{parse_id, parse_optional_i64};
use crate::startup::AppState;

use super::action_type;

/// `POST /message/action?to_user_id=&action_type=1&content=`
pub async fn action(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Query(query): Query<MessageActionQuery>,
) -> Result<Json<ApiResponse<Ack>>, AppError> {
    let to_user_id = parse_id("to_user_id", query.to_user_id.as_deref())?;
    let action = action_type(query.action_type.as_deref())?;
    let content = query.content.as_deref().unwrap_or_default();

    state
        .messages
        .send(user_id, to_user_id, action, content)
        .await?;

    Ok(Json(ApiResponse::ack()))
}

/// `GET /message/chat?to_user_id=&pre_msg_time=`
pub async fn chat(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Query(query): Query<ChatQuery>,
) -> Result<Json<ApiResponse<MessageListData>>, AppError> {
    let peer_id = parse_id("to_user_id", query.to_user_id.as_deref())?;
    let after = parse_optional_i64("pre_msg_time", query.pre_msg_time.as_deref())?;

    let message_list = state.messages.chat(user_id, peer_id, after).await?;

    Ok(Json(ApiResponse::ok(MessageListData { message_list })))
}
