//! Orders placed from this browser session.
//!
//! There are no customer accounts; the session remembers the ids of orders it
//! placed, and only those can be viewed here.

use std::collections::HashMap;

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use forkful_backend::repo::{CatalogRepository, OrderRepository};
use forkful_core::{LineItem, Order, OrderId, OrderStatus, ProductId};
use tower_sessions::Session;
use tracing::instrument;

use super::Layout;
use crate::config::StoreInfo;
use crate::error::{AppError, Result};
use crate::models::session::placed_orders;
use crate::state::AppState;

/// Status badge display data.
#[derive(Clone)]
pub struct StatusView {
    pub label: String,
    pub class: String,
    /// Keep polling while the order can still change.
    pub live: bool,
}

impl From<OrderStatus> for StatusView {
    fn from(status: OrderStatus) -> Self {
        Self {
            label: status.label().to_string(),
            class: status.badge_class().to_string(),
            live: !status.is_final(),
        }
    }
}

/// Order line display data.
#[derive(Clone)]
pub struct LineView {
    pub name: String,
    pub quantity: u32,
    pub options: Vec<String>,
    pub line_total: Option<String>,
}

/// Order display data.
#[derive(Clone)]
pub struct OrderView {
    pub id: String,
    pub short_id: String,
    pub placed_at: String,
    pub status: StatusView,
    pub items: Vec<LineView>,
    pub item_count: u32,
    pub total: String,
    pub address: String,
}

impl OrderView {
    fn new(order: &Order, names: &HashMap<ProductId, String>, store: &StoreInfo) -> Self {
        Self {
            id: order.id.to_string(),
            short_id: order.short_id(),
            placed_at: format_time(order.created_at),
            status: order.status.into(),
            items: order
                .items
                .iter()
                .map(|item| LineView {
                    name: line_name(item, names),
                    quantity: item.quantity,
                    options: item.options.clone(),
                    line_total: item.line_total().map(|t| store.price(t)),
                })
                .collect(),
            item_count: order.item_count(),
            total: store.price(order.total),
            address: order.address.one_line(),
        }
    }
}

/// Name recorded on the line, else the current catalog name.
fn line_name(item: &LineItem, names: &HashMap<ProductId, String>) -> String {
    item.name
        .clone()
        .or_else(|| item.product_id.and_then(|id| names.get(&id).cloned()))
        .unwrap_or_else(|| "Removed item".to_string())
}

fn format_time(at: Option<DateTime<Utc>>) -> String {
    at.map_or_else(String::new, |t| t.format("%d/%m/%Y %H:%M").to_string())
}

/// Product ids on lines that carry no recorded name.
fn unnamed_products(orders: &[Order]) -> Vec<ProductId> {
    let mut ids: Vec<ProductId> = orders
        .iter()
        .flat_map(|o| o.items.iter())
        .filter(|item| item.name.is_none())
        .filter_map(|item| item.product_id)
        .collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Order list template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersIndexTemplate {
    pub layout: Layout,
    pub orders: Vec<OrderView>,
    pub error: Option<String>,
}

/// Order page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/show.html")]
pub struct OrderShowTemplate {
    pub layout: Layout,
    pub order: OrderView,
}

/// Status badge fragment template (for HTMX polling).
#[derive(Template, WebTemplate)]
#[template(path = "partials/order_status.html")]
pub struct OrderStatusTemplate {
    pub id: String,
    pub status: StatusView,
}

/// Resolve an order id from the path, if this session placed it.
async fn owned_order_id(session: &Session, raw: &str) -> Result<OrderId> {
    let not_found = || AppError::NotFound(format!("order {raw}"));
    let id = raw.parse::<OrderId>().map_err(|_| not_found())?;
    if placed_orders(session).await.contains(&id) {
        Ok(id)
    } else {
        Err(not_found())
    }
}

/// Display orders placed from this session, newest first.
#[instrument(skip(state, session))]
pub async fn index(State(state): State<AppState>, session: Session) -> OrdersIndexTemplate {
    let ids = placed_orders(&session).await;
    let layout = Layout::load(&state, &session).await;

    if ids.is_empty() {
        return OrdersIndexTemplate {
            layout,
            orders: Vec::new(),
            error: None,
        };
    }

    let loaded = match OrderRepository::new(state.backend()).by_ids(&ids).await {
        Ok(orders) => {
            let wanted = unnamed_products(&orders);
            let names = CatalogRepository::new(state.backend())
                .product_names(&wanted)
                .await
                .unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "Failed to resolve product names");
                    HashMap::new()
                });
            Ok((orders, names))
        }
        Err(e) => Err(e),
    };

    match loaded {
        Ok((orders, names)) => OrdersIndexTemplate {
            layout,
            orders: orders
                .iter()
                .map(|o| OrderView::new(o, &names, state.store()))
                .collect(),
            error: None,
        },
        Err(e) => {
            tracing::error!(error = %e, "Failed to load orders");
            OrdersIndexTemplate {
                layout,
                orders: Vec::new(),
                error: Some("We couldn't load your orders. Please try again.".to_string()),
            }
        }
    }
}

/// Display one order.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<OrderShowTemplate> {
    let id = owned_order_id(&session, &id).await?;
    let order = OrderRepository::new(state.backend()).get(id).await?;

    let wanted = unnamed_products(std::slice::from_ref(&order));
    let names = CatalogRepository::new(state.backend())
        .product_names(&wanted)
        .await?;

    Ok(OrderShowTemplate {
        layout: Layout::load(&state, &session).await,
        order: OrderView::new(&order, &names, state.store()),
    })
}

/// Current status badge (HTMX, polled by the order page).
#[instrument(skip(state, session))]
pub async fn status(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<OrderStatusTemplate> {
    let id = owned_order_id(&session, &id).await?;
    let order = OrderRepository::new(state.backend()).get(id).await?;

    Ok(OrderStatusTemplate {
        id: order.id.to_string(),
        status: order.status.into(),
    })
}
