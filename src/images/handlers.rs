use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    middleware,
    routing::post,
    Router,
};
use serde::Serialize;
use tracing::{info, instrument};

use super::services::{upload_image, UploadItem};
use crate::{
    auth::{extractors::AuthUser, middleware::require_token},
    error::{AppError, AppResult},
    response::ApiResponse,
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct UploadedImage {
    pub url: String,
}

pub fn upload_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/upload-image", post(upload))
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024)) // 10MB
        .route_layer(middleware::from_fn_with_state(
            state.tokens.clone(),
            require_token,
        ))
}

/// POST /upload-image (multipart field `file`)
#[instrument(skip(state, mp))]
pub async fn upload(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    mut mp: Multipart,
) -> AppResult<ApiResponse<UploadedImage>> {
    let mut file = None;
    while let Some(field) = mp
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let content_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| "application/octet-stream".into());
        let body = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;
        file = Some(UploadItem {
            file_name,
            content_type,
            body,
        });
        break;
    }

    let Some(item) = file else {
        return Err(AppError::Validation("file: is required".into()));
    };

    let url = upload_image(state.storage.as_ref(), item).await?;
    info!(%url, "image uploaded");
    Ok(ApiResponse::created_with(
        "Success upload image",
        UploadedImage { url },
    ))
}
