//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Product listing (?category=<id>, ?q=<text>)
//!
//! # Products
//! GET  /products/{id}           - Product detail with options
//! POST /products/{id}/quote     - Live price for the posted selection (fragment)
//!
//! # Cart (HTMX fragments)
//! GET  /cart                    - Cart page
//! POST /cart/add                - Add to cart (result fragment, triggers cart-updated)
//! POST /cart/update             - Update quantity, 0 removes (cart_items fragment)
//! POST /cart/remove             - Remove line (cart_items fragment)
//! GET  /cart/count              - Cart count badge (fragment)
//!
//! # Checkout
//! GET  /checkout                - Checkout form
//! POST /checkout                - Place order, redirect to its page
//!
//! # Orders placed from this session
//! GET  /orders                  - Order list
//! GET  /orders/{id}             - Order page
//! GET  /orders/{id}/status      - Status badge (fragment, polled)
//! ```

pub mod cart;
pub mod checkout;
pub mod home;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};
use tower_sessions::Session;

use crate::models::session::load_cart;
use crate::state::AppState;

/// Header/footer data every full page renders.
#[derive(Clone)]
pub struct Layout {
    pub store_name: String,
    pub store_phone: Option<String>,
    pub cart_count: u32,
}

impl Layout {
    /// Build the layout for the current visitor.
    pub async fn load(state: &AppState, session: &Session) -> Self {
        let store = state.store();
        Self {
            store_name: store.name.clone(),
            store_phone: store.phone.clone(),
            cart_count: load_cart(session).await.item_count(),
        }
    }
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(products::show))
        .route("/{id}/quote", post(products::quote))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show))
        .route("/{id}/status", get(orders::status))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .route("/checkout", get(checkout::show).post(checkout::submit))
        .nest("/orders", order_routes())
}
