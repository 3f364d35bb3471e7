//! Image Serving Handler
//!
//! Plain static path lookup over the upload directory.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

/// GET /api/image/{filename} - 返回已上传的图片
pub async fn serve(
    State(state): State<ServerState>,
    Path(filename): Path<String>,
) -> AppResult<Response> {
    let path = state.images.resolve(&filename)?;
    let data = tokio::fs::read(&path)
        .await
        .map_err(|e| AppError::internal(format!("Failed to read image: {}", e)))?;

    let mime = mime_guess::from_path(&path).first_or_octet_stream();
    Ok(([(header::CONTENT_TYPE, mime.to_string())], data).into_response())
}
