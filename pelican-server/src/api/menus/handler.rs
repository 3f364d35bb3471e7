//! Menu API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use shared::models::{MenuItem, MenuItemInput};

use crate::core::ServerState;
use crate::utils::{AppError, AppResponse, AppResult, ok};

/// POST /api/restaurants/{id}/menu - 全量替换餐厅菜单
///
/// Replaces the previous snapshot wholesale and resets its TTL clock.
pub async fn set_menu(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(items): Json<Vec<MenuItemInput>>,
) -> AppResult<Json<AppResponse<Vec<MenuItem>>>> {
    Ok(ok(state.menus.set_menu(&id, items)?))
}

/// GET /api/restaurants/{id}/menu - 获取餐厅菜单
///
/// NotFound covers both an absent and an expired snapshot.
pub async fn get_menu(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Vec<MenuItem>>>> {
    let menu = state
        .menus
        .get_menu(&id)
        .ok_or_else(|| AppError::not_found(format!("Menu for restaurant {}", id)))?;
    Ok(ok(menu))
}
