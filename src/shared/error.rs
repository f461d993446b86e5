//! Application Error Types
//!
//! Centralized error handling with Axum integration.
//!
//! Every failure is rendered in the platform's response envelope:
//! `{"status_code": 1, "status_msg": "...", "error_code": "..."}`.
//! Business errors keep HTTP 200 so that clients read the envelope;
//! only credential failures change the HTTP status.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("missing required field {0}")]
    MissingField(String),

    #[error("field {field} with value {value} already exists")]
    AlreadyExists { field: String, value: String },

    #[error("cannot find {entity} with {key}: {value}")]
    NotFound {
        entity: String,
        key: String,
        value: String,
    },

    #[error("password incorrect")]
    PasswordIncorrect,

    #[error("invalid token")]
    InvalidToken,

    #[error("token expired")]
    TokenExpired,

    #[error("invalid video format: {0}")]
    InvalidVideoFormat(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("media tool error: {0}")]
    MediaTool(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(entity: &str, key: &str, value: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    pub fn already_exists(field: &str, value: impl ToString) -> Self {
        Self::AlreadyExists {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    pub fn missing(field: &str) -> Self {
        Self::MissingField(field.to_string())
    }

    /// Stable machine-readable code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::MissingField(_) => "MISSING_FIELD",
            AppError::AlreadyExists { .. } => "ALREADY_EXISTS",
            AppError::NotFound { .. } => "NOT_FOUND",
            AppError::PasswordIncorrect => "PASSWORD_INCORRECT",
            AppError::InvalidToken => "INVALID_TOKEN",
            AppError::TokenExpired => "TOKEN_EXPIRED",
            AppError::InvalidVideoFormat(_) => "INVALID_VIDEO_FORMAT",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::Io(_) => "IO_ERROR",
            AppError::MediaTool(_) => "MEDIA_TOOL_ERROR",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// HTTP status carried by the response.
    pub fn http_status(&self) -> StatusCode {
        match self {
            AppError::InvalidToken | AppError::TokenExpired => StatusCode::UNAUTHORIZED,
            _ => StatusCode::OK,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status_code: i32,
    pub status_msg: String,
    pub error_code: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_msg = match &self {
            AppError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                "internal server error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                "internal server error".to_string()
            }
            AppError::Io(e) => {
                tracing::warn!(error = %e, "I/O error");
                self.to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorResponse {
            status_code: 1,
            status_msg,
            error_code: self.code(),
        };

        (self.http_status(), Json(body)).into_response()
    }
}
