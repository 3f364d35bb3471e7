//! Order API Module
//!
//! All mutations go through the OrderRegistry; the `{id}` segment is an owner
//! id for listing/creation and an order id for the status route.

mod handler;

use axum::{
    Router,
    routing::{get, patch},
};

use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new()
        // Courier pickup polling (READY + unassigned)
        .route("/api/orders/available", get(handler::list_available))
        // Owner-scoped listing and batch creation
        .route(
            "/api/orders/{id}",
            get(handler::list).post(handler::create),
        )
        // Status transition (+ optional courier assignment)
        .route("/api/orders/{id}/status", patch(handler::update_status))
}
