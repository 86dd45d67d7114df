//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Redirect to /orders
//!
//! # Orders
//! GET  /orders                  - Order list (?status=<status|all>, ?page=<n>)
//! GET  /orders/{id}             - Order detail dialog (fragment)
//! POST /orders/{id}/status      - Set status (row fragment, or toast on failure)
//! ```

pub mod orders;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

use crate::state::AppState;

/// Build the admin router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/orders") }))
        .route("/orders", get(orders::index))
        .route("/orders/{id}", get(orders::show))
        .route("/orders/{id}/status", post(orders::update_status))
}
