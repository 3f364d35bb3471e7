//! Message API Module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Message router
pub fn router() -> Router<ServerState> {
    Router::new().route(
        "/api/orders/{id}/messages",
        get(handler::list).post(handler::create),
    )
}
