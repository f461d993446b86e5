//! Validation Utilities

use validator::ValidationErrors;

use super::error::AppError;

/// Convert validation errors to AppError.
///
/// Only the first offending field is reported, matching the single
/// `status_msg` slot of the response envelope.
pub fn validation_error(errors: ValidationErrors) -> AppError {
    let message = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let detail = e
                    .message
                    .clone()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                format!("{}: {}", field, detail)
            })
        })
        .next()
        .unwrap_or_else(|| "validation failed".into());

    AppError::BadRequest(message)
}

/// Require a present, non-blank query/form value.
pub fn require<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str, AppError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::missing(field)),
    }
}

/// Parse a required numeric identifier.
pub fn parse_id(field: &str, value: Option<&str>) -> Result<i64, AppError> {
    let raw = require(field, value)?;
    raw.parse::<i64>()
        .map_err(|_| AppError::BadRequest(format!("{} is not a valid id: {}", field, raw)))
}

/// Parse an optional numeric value, treating blanks as absent.
pub fn parse_optional_i64(field: &str, value: Option<&str>) -> Result<Option<i64>, AppError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<i64>()
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("{} is not a valid number: {}", field, raw))),
    }
}
