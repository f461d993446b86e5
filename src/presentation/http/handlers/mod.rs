//! HTTP Handlers
//!
//! Request handlers for all HTTP endpoints.

pub mod auth;
pub mod comment;
pub mod favorite;
pub mod feed;
pub mod health;
pub mod message;
pub mod publish;
pub mod relation;
pub mod user;

use crate::domain::ActionType;
use crate::shared::error::AppError;

/// Parse the `action_type` query value; absent counts as missing.
pub(crate) fn action_type(value: Option<&str>) -> Result<ActionType, AppError> {
    value.unwrap_or_default().parse()
}
