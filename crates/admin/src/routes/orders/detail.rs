//! Order detail dialog handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use forkful_backend::repo::{CatalogRepository, OrderRepository, ProfileRepository};
use forkful_core::{OrderId, ProductId};
use tracing::instrument;

use super::types::OrderDetailView;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Order detail dialog fragment (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/order_detail.html")]
pub struct OrderDetailTemplate {
    pub order: OrderDetailView,
}

/// Order detail dialog handler.
///
/// A missing profile or product name degrades to a placeholder rather than
/// failing the dialog.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<OrderDetailTemplate> {
    let id = id
        .parse::<OrderId>()
        .map_err(|_| AppError::NotFound(format!("order {id}")))?;
    let order = OrderRepository::new(state.backend()).get(id).await?;

    let profile = match order.user_id {
        Some(user_id) => ProfileRepository::new(state.backend())
            .get(user_id)
            .await
            .inspect_err(|e| tracing::warn!(user_id = %user_id, error = %e, "Failed to load profile"))
            .ok(),
        None => None,
    };

    let mut wanted: Vec<ProductId> = order
        .items
        .iter()
        .filter(|item| item.name.is_none())
        .filter_map(|item| item.product_id)
        .collect();
    wanted.sort_unstable();
    wanted.dedup();

    let names = CatalogRepository::new(state.backend())
        .product_names(&wanted)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to resolve product names");
            std::collections::HashMap::new()
        });

    Ok(OrderDetailTemplate {
        order: OrderDetailView::new(&order, profile.as_ref(), &names, state.config()),
    })
}
