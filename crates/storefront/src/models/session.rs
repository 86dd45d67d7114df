//! Session-related types and helpers.
//!
//! The visitor's cart and the ids of orders they placed are the only state
//! kept per visitor; both live in the tower-sessions record.

use forkful_core::{Cart, OrderId};
use tower_sessions::Session;

/// Most recent orders remembered per session.
pub const MAX_REMEMBERED_ORDERS: usize = 20;

/// Session keys.
pub mod keys {
    /// Key for the serialized [`forkful_core::Cart`].
    pub const CART: &str = "cart";

    /// Key for ids of orders placed from this session, newest first.
    pub const PLACED_ORDERS: &str = "placed_orders";

    /// Key for the last checkout form (name, phone, address) to prefill.
    pub const CUSTOMER: &str = "customer";
}

/// Load the cart, treating a missing or unreadable entry as empty.
pub async fn load_cart(session: &Session) -> Cart {
    match session.get::<Cart>(keys::CART).await {
        Ok(cart) => cart.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read cart from session");
            Cart::default()
        }
    }
}

/// Persist the cart.
///
/// # Errors
///
/// Returns an error if the session store rejects the write.
pub async fn save_cart(
    session: &Session,
    cart: &Cart,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::CART, cart).await
}

/// Ids of orders placed from this session, newest first.
pub async fn placed_orders(session: &Session) -> Vec<OrderId> {
    session
        .get::<Vec<OrderId>>(keys::PLACED_ORDERS)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Remember a newly placed order.
///
/// # Errors
///
/// Returns an error if the session store rejects the write.
pub async fn remember_order(
    session: &Session,
    id: OrderId,
) -> Result<(), tower_sessions::session::Error> {
    let ids = push_recent(placed_orders(session).await, id);
    session.insert(keys::PLACED_ORDERS, ids).await
}

/// Put `id` first, dropping duplicates and anything past the cap.
fn push_recent(mut ids: Vec<OrderId>, id: OrderId) -> Vec<OrderId> {
    ids.retain(|existing| *existing != id);
    ids.insert(0, id);
    ids.truncate(MAX_REMEMBERED_ORDERS);
    ids
}
