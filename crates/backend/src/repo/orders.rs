//! Orders: placement, lookup, listing and status changes.

use chrono::{DateTime, Utc};
use forkful_core::order::{NewOrder, StatusUpdate};
use forkful_core::{Order, OrderId, OrderRow, OrderStatus};

use crate::{BackendClient, BackendError, Direction, Query, Table};

/// One page of the admin order list.
#[derive(Debug, Clone)]
pub struct OrderPage {
    pub orders: Vec<Order>,
    /// 1-based page number.
    pub page: u32,
    pub has_next: bool,
}

/// Repository for orders.
pub struct OrderRepository<'a> {
    client: &'a BackendClient,
}

impl<'a> OrderRepository<'a> {
    #[must_use]
    pub const fn new(client: &'a BackendClient) -> Self {
        Self { client }
    }

    /// Insert a new order and return it as stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the row.
    pub async fn place(&self, order: &NewOrder) -> Result<Order, BackendError> {
        let rows: Vec<OrderRow> = self.client.insert(Table::Orders, order).await?;
        first(rows)
    }

    /// Look up one order.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] if no order has this id.
    pub async fn get(&self, id: OrderId) -> Result<Order, BackendError> {
        let row: OrderRow = self
            .client
            .select_one(Table::Orders, Query::new().eq("id", id))
            .await?;
        Ok(row.normalize())
    }

    /// Orders with the given ids, newest first. Unknown ids are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails.
    pub async fn by_ids(&self, ids: &[OrderId]) -> Result<Vec<Order>, BackendError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = Query::new()
            .in_list("id", ids)
            .order("created_at", Direction::Desc);
        let rows: Vec<OrderRow> = self.client.select(Table::Orders, &query).await?;
        Ok(rows.into_iter().map(OrderRow::normalize).collect())
    }

    /// A page of orders, newest first, optionally filtered by status.
    ///
    /// `page` is 1-based; zero is treated as one.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails.
    pub async fn list(
        &self,
        status: Option<OrderStatus>,
        page: u32,
        per_page: u32,
    ) -> Result<OrderPage, BackendError> {
        let page = page.max(1);
        let rows: Vec<OrderRow> = self
            .client
            .select(Table::Orders, &list_query(status, page, per_page))
            .await?;

        let has_next = rows.len() > per_page as usize;
        let orders = rows
            .into_iter()
            .take(per_page as usize)
            .map(OrderRow::normalize)
            .collect();

        Ok(OrderPage {
            orders,
            page,
            has_next,
        })
    }

    /// Write `{status, updated_at}` to one order.
    ///
    /// There is no transition guard; any status can be set from any other.
    /// Callers patch their copy with [`Order::apply_status`] on success.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] if no order has this id.
    pub async fn set_status(
        &self,
        id: OrderId,
        status: OrderStatus,
        now: DateTime<Utc>,
    ) -> Result<(), BackendError> {
        let patch = StatusUpdate {
            status,
            updated_at: now,
        };
        let rows: Vec<OrderRow> = self
            .client
            .update(Table::Orders, &Query::new().eq("id", id), &patch)
            .await?;
        first(rows).map(|_| ())
    }
}

fn first(rows: Vec<OrderRow>) -> Result<Order, BackendError> {
    rows.into_iter()
        .next()
        .map(OrderRow::normalize)
        .ok_or_else(|| BackendError::NotFound(Table::Orders.to_string()))
}

/// One extra row is fetched to learn whether a next page exists.
///
/// Offsets past `u32::MAX` saturate, which the backend answers with an
/// empty page.
fn list_query(status: Option<OrderStatus>, page: u32, per_page: u32) -> Query {
    let offset = page.saturating_sub(1).saturating_mul(per_page);
    let mut query = Query::new()
        .order("created_at", Direction::Desc)
        .limit(per_page.saturating_add(1))
        .offset(offset);
    if let Some(status) = status {
        query = query.eq("status", status);
    }
    query
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn render(query: &Query) -> Vec<String> {
        query
            .to_pairs()
            .unwrap()
            .into_iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect()
    }

    #[test]
    fn test_list_query_first_page() {
        assert_eq!(
            render(&list_query(None, 1, 25)),
            ["select=*", "order=created_at.desc", "limit=26", "offset=0"]
        );
    }

    #[test]
    fn test_list_query_with_status() {
        assert_eq!(
            render(&list_query(Some(OrderStatus::AwaitingPayment), 3, 25)),
            [
                "select=*",
                "status=eq.awaiting_payment",
                "order=created_at.desc",
                "limit=26",
                "offset=50",
            ]
        );
    }

    #[test]
    fn test_list_query_huge_page_saturates() {
        let max_offset = format!("offset={}", u32::MAX);
        let max_limit = format!("limit={}", u32::MAX);
        assert_eq!(
            render(&list_query(None, u32::MAX, 25)),
            ["select=*", "order=created_at.desc", "limit=26", max_offset.as_str()]
        );
        assert_eq!(
            render(&list_query(None, 2, u32::MAX)),
            ["select=*", "order=created_at.desc", max_limit.as_str(), max_offset.as_str()]
        );
    }

    #[test]
    fn test_first_of_empty_is_not_found() {
        assert!(first(Vec::new()).unwrap_err().is_not_found());
    }
}
