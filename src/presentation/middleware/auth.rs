//! Authentication Middleware
//!
//! Resolves the caller's token to an account id and stores it in request
//! extensions. Tokens are accepted from, in order:
//! - the `token` query parameter,
//! - a `token` header,
//! - `Authorization: Bearer <token>`.

use axum::{
    extract::{Query, Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};
use serde::Deserialize;

use crate::shared::error::AppError;
use crate::startup::AppState;

/// Authenticated account, inserted into request extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
}

#[derive(Debug, Default, Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

/// Find the caller's token, if any.
pub fn extract_token(request: &Request) -> Option<String> {
    let from_query = Query::<TokenQuery>::try_from_uri(request.uri())
        .ok()
        .and_then(|Query(q)| q.token);

    let from_header = || {
        request
            .headers()
            .get("token")
            .and_then(|h| h.to_str().ok())
            .map(str::to_string)
    };

    let from_bearer = || {
        request
            .headers()
            .typed_get::<Authorization<Bearer>>()
            .map(|auth| auth.token().to_string())
    };

    from_query
        .or_else(from_header)
        .or_else(from_bearer)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Authentication middleware for routes that require a caller.
///
/// Missing, malformed and expired tokens are rejected with 401.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(&request).ok_or(AppError::InvalidToken)?;
    let user_id = state.tokens.verify(&token)?;

    request.extensions_mut().insert(AuthUser { user_id });

    Ok(next.run(request).await)
}

/// Optional authentication middleware (doesn't fail if no token)
///
/// A bad token is treated the same as no token.
pub async fn optional_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = extract_token(&request) {
        match state.tokens.verify(&token) {
            Ok(user_id) => {
                request.extensions_mut().insert(AuthUser { user_id });
            }
            Err(e) => tracing::debug!(error = %e, "Ignoring unusable token"),
        }
    }

    next.run(request).await
}
