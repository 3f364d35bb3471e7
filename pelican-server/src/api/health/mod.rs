//! Health Check Module

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;
use crate::utils::{AppResponse, ok};

#[derive(Debug, Serialize)]
pub struct HealthInfo {
    pub status: &'static str,
    /// 当前实时连接数
    pub connections: usize,
    /// 注册表中的订单总数
    pub orders: usize,
}

/// Health router
pub fn router() -> Router<ServerState> {
    Router::new().route("/api/health", get(health))
}

/// GET /api/health - 存活探针
async fn health(State(state): State<ServerState>) -> Json<AppResponse<HealthInfo>> {
    ok(HealthInfo {
        status: "ok",
        connections: state.bus.connection_count(),
        orders: state.orders.len(),
    })
}
