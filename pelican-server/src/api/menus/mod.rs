//! Menu API Module
//!
//! A menu is addressed through its restaurant: full-replace POST, windowed GET.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Menu router
pub fn router() -> Router<ServerState> {
    Router::new().route(
        "/api/restaurants/{id}/menu",
        get(handler::get_menu).post(handler::set_menu),
    )
}
