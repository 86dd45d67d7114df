//! Order status changes.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{AppendHeaders, IntoResponse, Response},
};
use chrono::Utc;
use forkful_backend::repo::{OrderRepository, ProfileRepository};
use forkful_core::{OrderId, OrderStatus};
use serde::Deserialize;
use tracing::instrument;

use super::types::{OrderRowTemplate, OrderRowView};
use crate::state::AppState;

/// Status change form input.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
}

/// Toast notification fragment (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/toast.html")]
pub struct ToastTemplate {
    pub message: String,
}

/// Render a failure toast into the page's toast stack instead of the row.
fn toast_error(message: impl Into<String>) -> Response {
    (
        AppendHeaders([("HX-Retarget", "#toasts"), ("HX-Reswap", "beforeend")]),
        ToastTemplate {
            message: message.into(),
        },
    )
        .into_response()
}

/// Update order status handler.
///
/// Writes `{status, updated_at}` straight to the backend with no transition
/// check, then re-renders the row from the local copy. Failures come back as
/// a toast; the row is left as it was.
#[instrument(skip(state))]
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<StatusForm>,
) -> Response {
    let Ok(id) = id.parse::<OrderId>() else {
        return toast_error("Unknown order");
    };
    let Ok(status) = form.status.parse::<OrderStatus>() else {
        return toast_error(format!("Unknown status \"{}\"", form.status));
    };

    let orders = OrderRepository::new(state.backend());
    let mut order = match orders.get(id).await {
        Ok(order) => order,
        Err(e) => {
            tracing::error!(order_id = %id, error = %e, "Failed to load order");
            return toast_error("Failed to load order");
        }
    };

    let now = Utc::now();
    if let Err(e) = orders.set_status(id, status, now).await {
        tracing::error!(order_id = %id, status = %status, error = %e, "Failed to update order status");
        return toast_error(format!("Failed to update order #{}", order.short_id()));
    }

    let previous = order.status;
    order.apply_status(status, now);
    tracing::info!(order_id = %id, from = %previous, to = %status, "Order status updated");

    let profile = match order.user_id {
        Some(user_id) => ProfileRepository::new(state.backend())
            .get(user_id)
            .await
            .inspect_err(|e| tracing::warn!(user_id = %user_id, error = %e, "Failed to load profile"))
            .ok(),
        None => None,
    };

    (
        AppendHeaders([("HX-Trigger", "order-updated")]),
        OrderRowTemplate {
            order: OrderRowView::new(&order, profile.as_ref(), state.config()),
        },
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    #[test]
    fn test_toast_error_retargets() {
        let response = toast_error("Failed to update order #1234abcd");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["HX-Retarget"], "#toasts");
        assert_eq!(response.headers()["HX-Reswap"], "beforeend");
    }
}
