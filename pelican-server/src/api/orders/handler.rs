//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use shared::models::{Order, OrderDraft, OrderStatus, OwnerRole};

use crate::core::ServerState;
use crate::utils::{AppResponse, AppResult, ok};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub role: Option<OwnerRole>,
}

/// GET /api/orders/{id}?role= - 按角色列出订单 (24h 窗口)
pub async fn list(
    State(state): State<ServerState>,
    Path(owner_id): Path<String>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<AppResponse<Vec<Order>>>> {
    let role = params.role.unwrap_or_default();
    Ok(ok(state.orders.list_orders(&owner_id, role)))
}

/// GET /api/orders/available - 可接单池 (READY 且未分配骑手)
pub async fn list_available(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Vec<Order>>>> {
    Ok(ok(state.orders.list_available()))
}

/// POST /api/orders/{id} - 批量创建订单
pub async fn create(
    State(state): State<ServerState>,
    Path(owner_id): Path<String>,
    Json(drafts): Json<Vec<OrderDraft>>,
) -> AppResult<Json<AppResponse<Vec<Order>>>> {
    Ok(ok(state.orders.create_orders(&owner_id, drafts)?))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusPayload {
    pub status: OrderStatus,
    pub courier_id: Option<String>,
    pub courier_name: Option<String>,
}

/// PATCH /api/orders/{id}/status - 订单状态迁移
///
/// The registry mutation comes first; courier bookkeeping is a separate
/// single-store step afterwards.
pub async fn update_status(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
    Json(payload): Json<UpdateStatusPayload>,
) -> AppResult<Json<AppResponse<Order>>> {
    let courier_provided = payload.courier_id.is_some();
    let order = state.orders.update_status(
        &order_id,
        payload.status,
        payload.courier_id,
        payload.courier_name,
    )?;

    if let Some(courier_id) = &order.courier_id {
        let name = order.courier_name.as_deref();
        match order.status {
            OrderStatus::Delivered => state.couriers.record_delivery(courier_id),
            _ if courier_provided => state.couriers.assign_order(courier_id, name, &order.id),
            _ => state.couriers.record_activity(courier_id, name),
        }
    }

    Ok(ok(order))
}
