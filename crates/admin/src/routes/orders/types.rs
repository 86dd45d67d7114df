//! Type definitions and conversions for order views.

use std::collections::HashMap;

use askama::Template;
use askama_web::WebTemplate;
use chrono::{DateTime, Utc};
use forkful_core::{Address, LineItem, Order, OrderStatus, ProductId, Profile};
use serde::Deserialize;

use crate::config::AdminConfig;

// =============================================================================
// Query Parameters
// =============================================================================

/// Query parameters for the orders list.
#[derive(Debug, Default, Deserialize)]
pub struct OrdersQuery {
    /// Status filter; empty or `all` means every status.
    pub status: Option<String>,
    /// 1-based page number.
    pub page: Option<u32>,
}

impl OrdersQuery {
    /// The status to filter by. Unknown values fall back to no filter.
    #[must_use]
    pub fn status_filter(&self) -> Option<OrderStatus> {
        let raw = self.status.as_deref().map(str::trim)?;
        if raw.is_empty() || raw == "all" {
            return None;
        }
        raw.parse()
            .inspect_err(|e| tracing::debug!(error = %e, "Ignoring status filter"))
            .ok()
    }

    /// Requested page, at least 1.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }
}

/// Link to the list with a given status filter and page.
#[must_use]
pub fn list_href(status: Option<OrderStatus>, page: u32) -> String {
    match status {
        Some(status) => format!("/orders?status={status}&page={page}"),
        None => format!("/orders?page={page}"),
    }
}

// =============================================================================
// Shared Pieces
// =============================================================================

/// Entry in a status `<select>` or filter bar.
#[derive(Debug, Clone)]
pub struct StatusOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Every status, with `current` marked.
#[must_use]
pub fn status_options(current: Option<OrderStatus>) -> Vec<StatusOption> {
    OrderStatus::ALL
        .iter()
        .map(|s| StatusOption {
            value: s.as_str().to_string(),
            label: s.label().to_string(),
            selected: Some(*s) == current,
        })
        .collect()
}

fn format_time(at: Option<DateTime<Utc>>) -> String {
    at.map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string())
}

fn customer_name(profile: Option<&Profile>) -> String {
    profile.map_or_else(|| "Unknown customer".to_string(), |p| p.display_name().to_string())
}

// =============================================================================
// Table Row
// =============================================================================

/// Order view for one table row.
#[derive(Debug, Clone)]
pub struct OrderRowView {
    pub id: String,
    pub short_id: String,
    pub customer: String,
    pub phone: Option<String>,
    pub placed_at: String,
    pub updated_at: String,
    pub item_count: u32,
    pub total: String,
    pub status_label: String,
    pub status_class: String,
    pub statuses: Vec<StatusOption>,
}

impl OrderRowView {
    #[must_use]
    pub fn new(order: &Order, profile: Option<&Profile>, config: &AdminConfig) -> Self {
        Self {
            id: order.id.to_string(),
            short_id: order.short_id(),
            customer: customer_name(profile),
            phone: profile.and_then(|p| p.phone.clone()),
            placed_at: format_time(order.created_at),
            updated_at: format_time(order.updated_at),
            item_count: order.item_count(),
            total: config.price(order.total),
            status_label: order.status.label().to_string(),
            status_class: order.status.badge_class().to_string(),
            statuses: status_options(Some(order.status)),
        }
    }
}

/// Single table row fragment (for HTMX swaps after a status change).
#[derive(Template, WebTemplate)]
#[template(path = "partials/order_row.html")]
pub struct OrderRowTemplate {
    pub order: OrderRowView,
}

// =============================================================================
// Detail
// =============================================================================

/// Line item view for the detail dialog.
#[derive(Debug, Clone)]
pub struct LineItemView {
    pub name: String,
    pub quantity: u32,
    pub options: Vec<String>,
    pub unit_price: Option<String>,
    pub total: Option<String>,
}

impl LineItemView {
    fn new(item: &LineItem, names: &HashMap<ProductId, String>, config: &AdminConfig) -> Self {
        let name = item
            .name
            .clone()
            .or_else(|| item.product_id.and_then(|id| names.get(&id).cloned()))
            .or_else(|| item.product_id.map(|id| format!("Product {id}")))
            .unwrap_or_else(|| "Unknown product".to_string());

        Self {
            name,
            quantity: item.quantity,
            options: item.options.clone(),
            unit_price: item.unit_price.map(|p| config.price(p)),
            total: item.line_total().map(|t| config.price(t)),
        }
    }
}

/// Order view for the detail dialog.
#[derive(Debug, Clone)]
pub struct OrderDetailView {
    pub id: String,
    pub short_id: String,
    pub customer: String,
    pub phone: Option<String>,
    pub placed_at: String,
    pub updated_at: String,
    pub status_label: String,
    pub status_class: String,
    pub items: Vec<LineItemView>,
    pub total: String,
    pub address: Address,
}

impl OrderDetailView {
    #[must_use]
    pub fn new(
        order: &Order,
        profile: Option<&Profile>,
        names: &HashMap<ProductId, String>,
        config: &AdminConfig,
    ) -> Self {
        Self {
            id: order.id.to_string(),
            short_id: order.short_id(),
            customer: customer_name(profile),
            phone: profile.and_then(|p| p.phone.clone()),
            placed_at: format_time(order.created_at),
            updated_at: format_time(order.updated_at),
            status_label: order.status.label().to_string(),
            status_class: order.status.badge_class().to_string(),
            items: order
                .items
                .iter()
                .map(|item| LineItemView::new(item, names, config))
                .collect(),
            total: config.price(order.total),
            address: order.address.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::TimeZone;
    use forkful_backend::BackendConfig;
    use forkful_core::{CurrencyCode, OrderId, UserId};
    use rust_decimal::Decimal;
    use secrecy::SecretString;
    use url::Url;

    use super::*;

    fn config() -> AdminConfig {
        AdminConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3001,
            base_url: "http://localhost:3001".to_string(),
            backend: BackendConfig::new(
                Url::parse("https://abcd.supabase.co").unwrap(),
                SecretString::from("k3Y-9fQ2xLm8Zr4Tb7Wp1Vn6"),
            ),
            currency: CurrencyCode::BRL,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        }
    }

    fn order() -> Order {
        Order {
            id: OrderId::generate(),
            user_id: Some(UserId::generate()),
            items: vec![LineItem {
                product_id: Some(ProductId::generate()),
                quantity: 2,
                options: vec!["Size: Large".to_string()],
                name: None,
                unit_price: Some(Decimal::new(1300, 2)),
            }],
            address: Address::default(),
            status: OrderStatus::Delivering,
            total: Decimal::new(2600, 2),
            created_at: Some(Utc.with_ymd_and_hms(2024, 3, 9, 18, 30, 0).unwrap()),
            updated_at: None,
        }
    }

    #[test]
    fn test_status_filter_parsing() {
        let query = |s: &str| OrdersQuery {
            status: Some(s.to_string()),
            page: None,
        };
        assert_eq!(query("delivered").status_filter(), Some(OrderStatus::Delivered));
        assert_eq!(query("all").status_filter(), None);
        assert_eq!(query("").status_filter(), None);
        assert_eq!(query("shipped").status_filter(), None);
        assert_eq!(OrdersQuery::default().status_filter(), None);
    }

    #[test]
    fn test_page_at_least_one() {
        assert_eq!(OrdersQuery::default().page(), 1);
        let query = OrdersQuery {
            status: None,
            page: Some(0),
        };
        assert_eq!(query.page(), 1);
    }

    #[test]
    fn test_list_href() {
        assert_eq!(list_href(None, 2), "/orders?page=2");
        assert_eq!(
            list_href(Some(OrderStatus::AwaitingPayment), 1),
            "/orders?status=awaiting_payment&page=1"
        );
    }

    #[test]
    fn test_row_view_marks_current_status() {
        let row = OrderRowView::new(&order(), None, &config());
        assert_eq!(row.customer, "Unknown customer");
        assert_eq!(row.total, "R$ 26.00");
        assert_eq!(row.placed_at, "2024-03-09 18:30");
        assert_eq!(row.updated_at, "-");
        let selected: Vec<_> = row.statuses.iter().filter(|s| s.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].value, "delivering");
    }

    #[test]
    fn test_detail_view_resolves_names() {
        let order = order();
        let product_id = order.items[0].product_id.unwrap();
        let names = HashMap::from([(product_id, "Margherita".to_string())]);
        let profile = Profile {
            id: order.user_id.unwrap(),
            full_name: Some("Ana Souza".to_string()),
            phone: Some("11987654321".to_string()),
        };

        let view = OrderDetailView::new(&order, Some(&profile), &names, &config());
        assert_eq!(view.customer, "Ana Souza");
        assert_eq!(view.items[0].name, "Margherita");
        assert_eq!(view.items[0].total.as_deref(), Some("R$ 26.00"));
        assert_eq!(view.address, Address::default());

        let view = OrderDetailView::new(&order, None, &HashMap::new(), &config());
        assert_eq!(view.items[0].name, format!("Product {product_id}"));
    }
}
