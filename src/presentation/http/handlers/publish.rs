//! Publish Handler
//!
//! Accepts `multipart/form-data` with the video under `data` (or `file`),
//! a `title` and, for clients that cannot set query or headers on uploads,
//! a `token` field.

use axum::{
    body::Bytes,
    extract::{Multipart, State},
    Json,
};

use crate::application::dto::response::{Ack, ApiResponse};
use crate::application::services::VideoUpload;
use crate::presentation::http::extractors::Viewer;
use crate::shared::error::AppError;
use crate::startup::AppState;

#[derive(Default)]
struct PublishForm {
    file_name: Option<String>,
    data: Option<Bytes>,
    title: Option<String>,
    token: Option<String>,
}

async fn read_form(mut multipart: Multipart) -> Result<PublishForm, AppError> {
    let mut form = PublishForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("malformed multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "data" | "file" => {
                form.file_name = field.file_name().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("failed to read upload: {}", e)))?;
                form.data = Some(bytes);
            }
            "title" | "token" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("failed to read {}: {}", name, e)))?;
                if name == "title" {
                    form.title = Some(text);
                } else {
                    form.token = Some(text);
                }
            }
            other => tracing::debug!(field = other, "Ignoring multipart field"),
        }
    }

    Ok(form)
}

/// `POST /publish`
pub async fn publish(
    State(state): State<AppState>,
    Viewer(viewer): Viewer,
    multipart: Multipart,
) -> Result<Json<ApiResponse<Ack>>, AppError> {
    let form = read_form(multipart).await?;

    let author_id = match (viewer, form.token.as_deref().map(str::trim)) {
        (Some(user_id), _) => user_id,
        (None, Some(token)) if !token.is_empty() => state.tokens.verify(token)?,
        _ => return Err(AppError::InvalidToken),
    };

    let data = form.data.ok_or_else(|| AppError::missing("data"))?;
    let title = form.title.unwrap_or_default();
    let file_name = form.file_name.unwrap_or_default();

    let mut body: &[u8] = &data;
    let name = state
        .publisher
        .publish(
            VideoUpload {
                file_name: &file_name,
                title: &title,
                body: &mut body,
            },
            author_id,
        )
        .await?;

    tracing::info!(author_id, name = %name, "Video published");
    Ok(Json(ApiResponse::ack()))
}
