//! User Handlers

use axum::{
    extract::{Query, State},
    Json,
};

use crate::application::dto::request::UserQuery;
use crate::application::dto::response::{ApiResponse, UserData};
use crate::presentation::http::extractors::Viewer;
use crate::shared::error::AppError;
use crate::shared::validation::parse_id;
use crate::startup::AppState;

/// `GET /user?user_id=`
pub async fn get_user(
    State(state): State<AppState>,
    Viewer(viewer): Viewer,
    Query(query): Query<UserQuery>,
) -> Result<Json<ApiResponse<UserData>>, AppError> {
    let user_id = parse_id("user_id", query.user_id.as_deref())?;
    let user = state.users.profile(viewer, user_id).await?;

    Ok(Json(ApiResponse::ok(UserData { user })))
}
