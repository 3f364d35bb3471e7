//! Restaurant API Module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Restaurant router
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/restaurants", get(handler::list).post(handler::upsert))
        .route("/api/restaurants/{id}", get(handler::get_by_id))
}
