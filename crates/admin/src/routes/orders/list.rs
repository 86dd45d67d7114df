//! Orders list page handler.

use std::collections::HashMap;

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use forkful_backend::BackendClient;
use forkful_backend::repo::{OrderRepository, ProfileRepository};
use forkful_core::{Order, OrderStatus, Profile, UserId};
use tracing::instrument;

use super::types::{OrderRowView, OrdersQuery, StatusOption, list_href, status_options};
use crate::state::AppState;

/// Orders per page.
pub const PER_PAGE: u32 = 25;

/// Orders list page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersIndexTemplate {
    pub orders: Vec<OrderRowView>,
    /// Status filter bar entries.
    pub filters: Vec<StatusOption>,
    /// No status filter is active.
    pub all_active: bool,
    pub page: u32,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
    pub error: Option<String>,
}

/// Orders list page handler.
///
/// Fetches one page, then looks up each distinct customer's profile in turn.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<OrdersQuery>,
) -> OrdersIndexTemplate {
    let status = query.status_filter();
    let page = query.page();

    let mut template = OrdersIndexTemplate {
        orders: Vec::new(),
        filters: status_options(status),
        all_active: status.is_none(),
        page,
        prev_href: (page > 1).then(|| list_href(status, page - 1)),
        next_href: None,
        error: None,
    };

    let result = OrderRepository::new(state.backend())
        .list(status, page, PER_PAGE)
        .await;

    match result {
        Ok(found) => {
            let profiles = load_profiles(state.backend(), &found.orders).await;
            template.orders = found
                .orders
                .iter()
                .map(|order| {
                    let profile = order.user_id.and_then(|id| profiles.get(&id));
                    OrderRowView::new(order, profile, state.config())
                })
                .collect();
            template.next_href = next_href(status, page, found.has_next);
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch orders");
            template.error = Some("Failed to load orders. Refresh to try again.".to_string());
        }
    }

    template
}

/// Link to the following page, if there is one and its number fits.
fn next_href(status: Option<OrderStatus>, page: u32, has_next: bool) -> Option<String> {
    page.checked_add(1)
        .filter(|_| has_next)
        .map(|next| list_href(status, next))
}

/// Look up the profile behind each distinct `user_id`, one request at a time.
///
/// Profiles that fail to load are left out; their rows show a placeholder.
async fn load_profiles(backend: &BackendClient, orders: &[Order]) -> HashMap<UserId, Profile> {
    let repo = ProfileRepository::new(backend);
    let mut profiles = HashMap::new();

    for user_id in distinct_users(orders) {
        match repo.get(user_id).await {
            Ok(profile) => {
                profiles.insert(user_id, profile);
            }
            Err(e) => {
                tracing::warn!(user_id = %user_id, error = %e, "Failed to load profile");
            }
        }
    }

    profiles
}

/// Customer ids in first-seen order, without repeats.
fn distinct_users(orders: &[Order]) -> Vec<UserId> {
    let mut seen = Vec::new();
    for id in orders.iter().filter_map(|o| o.user_id) {
        if !seen.contains(&id) {
            seen.push(id);
        }
    }
    seen
}
