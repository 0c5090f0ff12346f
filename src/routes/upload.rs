/**
 * Upload Routes
 * Admin uploads of images and PDF documents
 */
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use super::extract::QueryParams;
use super::SuccessResponse;
use crate::auth::AdminSession;
use crate::blob::StoredBlob;
use crate::error::{AppError, Result};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    pub url: Option<String>,
}

/// POST /api/upload
/// Stores the first file part of the multipart body.
pub async fn upload_file(
    _admin: AdminSession,
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<StoredBlob>)> {
    let mut multipart = multipart?;
    loop {
        let field = multipart
            .next_field()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "multipart error");
                AppError::validation("Invalid multipart data")
            })?
            .ok_or_else(|| AppError::validation("No file provided"))?;

        let Some(original_name) = field.file_name().map(str::to_string) else {
            // Plain form fields are skipped.
            continue;
        };
        let bytes = field.bytes().await.map_err(|e| {
            tracing::warn!(error = %e, "failed to read upload bytes");
            AppError::validation("Failed to read file data")
        })?;

        let stored = state.blobs.save(&original_name, &bytes).await?;
        return Ok((StatusCode::CREATED, Json(stored)));
    }
}

/// DELETE /api/upload?url=
pub async fn delete_file(
    _admin: AdminSession,
    State(state): State<AppState>,
    QueryParams(query): QueryParams<DeleteQuery>,
) -> Result<Json<SuccessResponse>> {
    let url = query
        .url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| AppError::validation("url is required"))?;

    if state.blobs.delete(&url).await? {
        Ok(Json(SuccessResponse::ok()))
    } else {
        Err(AppError::not_found("File not found"))
    }
}
