//! Restaurant API Handlers

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
};
use serde::Deserialize;

use shared::models::{Restaurant, RestaurantUpsert};

use crate::core::ServerState;
use crate::utils::{AppError, AppResponse, AppResult, ok};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub include_inactive: bool,
}

/// GET /api/restaurants - 获取餐厅列表
pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<AppResponse<Vec<Restaurant>>>> {
    Ok(ok(state.restaurants.list(params.include_inactive)))
}

/// GET /api/restaurants/{id} - 获取单个餐厅
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Restaurant>>> {
    let restaurant = state
        .restaurants
        .get(&id)
        .ok_or_else(|| AppError::not_found(format!("Restaurant {}", id)))?;
    Ok(ok(restaurant))
}

/// POST /api/restaurants - 全量覆盖式创建/更新餐厅
///
/// Multipart form: text fields `id`, `name`, `is_active`, optional file field
/// `image` carrying the cover. A replaced cover's old file is deleted
/// best-effort after the upsert lands.
pub async fn upsert(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> AppResult<Json<AppResponse<Restaurant>>> {
    let mut id: Option<String> = None;
    let mut name: Option<String> = None;
    let mut is_active = true;
    let mut image: Option<(Vec<u8>, String)> = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("id") => id = Some(field.text().await?),
            Some("name") => name = Some(field.text().await?),
            Some("is_active") => {
                let raw = field.text().await?;
                is_active = raw.parse().map_err(|_| {
                    AppError::validation(format!("Invalid is_active value: {}", raw))
                })?;
            }
            Some("image") => {
                let filename = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| AppError::validation("No filename provided in image field"))?;
                let data = field.bytes().await?.to_vec();
                image = Some((data, filename));
            }
            _ => {}
        }
    }

    let id = id.ok_or_else(|| AppError::validation("Restaurant id is required"))?;
    let name = name.ok_or_else(|| AppError::validation("Restaurant name is required"))?;

    let cover = match image {
        Some((data, filename)) => Some(state.images.store(&data, &filename)?.filename),
        None => None,
    };

    let (restaurant, replaced_cover) = state
        .restaurants
        .upsert(RestaurantUpsert { id, name, is_active }, cover)?;

    // The old cover is an orphan now; removal failures only get logged
    if let Some(old) = replaced_cover {
        state.images.delete(&old);
    }

    Ok(ok(restaurant))
}
