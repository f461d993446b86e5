//! Custom Extractors
//!
//! Read the account resolved by the auth middleware.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;

/// Caller of a route behind `auth_middleware`.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub i64);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .map(|user| CurrentUser(user.user_id))
            .ok_or(AppError::InvalidToken)
    }
}

/// Caller of a route behind `optional_auth_middleware`; `None` when anonymous.
#[derive(Debug, Clone, Copy)]
pub struct Viewer(pub Option<i64>);

impl<S> FromRequestParts<S> for Viewer
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Viewer(parts.extensions.get::<AuthUser>().map(|user| user.user_id)))
    }
}
