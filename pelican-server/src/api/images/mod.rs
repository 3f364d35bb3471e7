//! Image Serving Module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Image router
pub fn router() -> Router<ServerState> {
    Router::new().route("/api/image/{filename}", get(handler::serve))
}
