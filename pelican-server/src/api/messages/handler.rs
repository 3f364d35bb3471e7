//! Message API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use shared::models::{ChatChannel, ChatMessage, ChatMessageCreate};

use crate::core::ServerState;
use crate::utils::{AppResponse, AppResult, ok};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub chat_type: Option<ChatChannel>,
}

/// GET /api/orders/{id}/messages?chat_type= - 列出订单消息 (3h 窗口)
pub async fn list(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<AppResponse<Vec<ChatMessage>>>> {
    Ok(ok(state.messages.list(&order_id, params.chat_type)))
}

/// POST /api/orders/{id}/messages - 发送消息
pub async fn create(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
    Json(payload): Json<ChatMessageCreate>,
) -> AppResult<Json<AppResponse<ChatMessage>>> {
    Ok(ok(state.messages.append(&order_id, payload)?))
}
