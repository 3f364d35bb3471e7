//! Image Upload Handler
//!
//! Standalone upload path for dish images: clients upload first, then
//! reference the returned filename from menu items.

use axum::{
    Json,
    extract::{Multipart, State},
};
use serde::Serialize;

use crate::core::ServerState;
use crate::utils::{AppError, AppResponse, AppResult, ok};

/// Upload response
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub filename: String,
    pub original_name: String,
    pub size: usize,
    pub format: String,
    pub url: String,
}

/// POST /api/upload - 上传图片
///
/// Multipart with a single `file` field. The image is validated, re-encoded
/// to JPEG and served back under `/api/image/{filename}`.
pub async fn upload(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> AppResult<Json<AppResponse<UploadResponse>>> {
    let mut field_data: Option<Vec<u8>> = None;
    let mut original_name: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().map(str::to_string);
        if field_name.as_deref() == Some("file") {
            original_name = field.file_name().map(str::to_string);
            field_data = Some(field.bytes().await?.to_vec());
            break;
        }
    }

    let data = field_data
        .ok_or_else(|| AppError::validation("No 'file' field found. Field name must be 'file'"))?;
    let original_name =
        original_name.ok_or_else(|| AppError::validation("No filename provided in file field"))?;

    let stored = state.images.store(&data, &original_name)?;

    let url = format!("/api/image/{}", stored.filename);
    Ok(ok(UploadResponse {
        filename: stored.filename,
        original_name,
        size: stored.size,
        format: "jpg".to_string(),
        url,
    }))
}
