//! Image Upload Module

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

/// Upload router
pub fn router() -> Router<ServerState> {
    Router::new().route("/api/upload", post(handler::upload))
}
