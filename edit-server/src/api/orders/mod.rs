//! Order edit API
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/orders/{order_id} | GET | edit view: resolved items, adjustments, anomalies |
//! | /api/orders/{order_id}/preview | POST | deltas an edit would apply |
//! | /api/orders/{order_id}/edits | POST | apply edits in one edit session |
//!
//! `{order_id}` is a bare numeric id or an order gid.

mod handler;

pub use handler::{EditRequest, EditResponse};

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/{order_id}", get(handler::get_order))
        .route("/{order_id}/preview", post(handler::preview))
        .route("/{order_id}/edits", post(handler::submit))
}
