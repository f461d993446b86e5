//! Authentication Handlers

use axum::{
    extract::{Query, State},
    Json,
};
use validator::Validate;

use crate::application::dto::request::CredentialsRequest;
use crate::application::dto::response::{ApiResponse, AuthData};
use crate::application::services::Session;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

fn auth_response(session: Session) -> Json<ApiResponse<AuthData>> {
    Json(ApiResponse::ok(AuthData {
        user_id: session.user_id,
        token: session.token,
    }))
}

/// `POST /register?username=&password=`
pub async fn register(
    State(state): State<AppState>,
    Query(body): Query<CredentialsRequest>,
) -> Result<Json<ApiResponse<AuthData>>, AppError> {
    body.validate().map_err(validation_error)?;

    let session = state
        .users
        .register(body.username.trim(), &body.password)
        .await?;

    Ok(auth_response(session))
}

/// `POST /login?username=&password=`
pub async fn login(
    State(state): State<AppState>,
    Query(body): Query<CredentialsRequest>,
) -> Result<Json<ApiResponse<AuthData>>, AppError> {
    body.validate().map_err(validation_error)?;

    let session = state.users.login(body.username.trim(), &body.password).await?;

    Ok(auth_response(session))
}
