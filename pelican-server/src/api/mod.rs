//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`restaurants`] - 餐厅目录接口
//! - [`menus`] - 菜单快照接口
//! - [`orders`] - 订单接口
//! - [`messages`] - 订单聊天接口
//! - [`upload`] - 图片上传接口
//! - [`images`] - 图片回读接口
//!
//! 实时通道挂载在 `/ws`，见 [`crate::message::ws`]。

pub mod health;
pub mod images;
pub mod menus;
pub mod messages;
pub mod orders;
pub mod restaurants;
pub mod upload;

use axum::{Router, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::core::ServerState;
use crate::message::ws;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// Assemble the full application router
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(restaurants::router())
        .merge(menus::router())
        .merge(orders::router())
        .merge(messages::router())
        .merge(upload::router())
        .merge(images::router())
        .route("/ws", get(ws::ws_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
