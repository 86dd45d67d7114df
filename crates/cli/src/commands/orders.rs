//! Order management commands.
//!
//! # Usage
//!
//! ```bash
//! forkful-cli orders set-status 4f9c2a1e-6d1b-4c55-9a57-0e1f2b3c4d5e delivered
//! ```
//!
//! # Environment Variables
//!
//! - `BACKEND_URL` - Data backend base URL
//! - `BACKEND_SERVICE_KEY` - Service-role key (HIGH PRIVILEGE)

use chrono::Utc;
use forkful_backend::repo::OrderRepository;
use forkful_core::{OrderId, OrderStatus};

use super::{CommandError, service_client};

/// Parse the command-line arguments into an order id and status.
fn parse_args(id: &str, status: &str) -> Result<(OrderId, OrderStatus), CommandError> {
    let id = id
        .parse::<OrderId>()
        .map_err(|e| CommandError::InvalidArgument("order id", e.to_string()))?;
    let status = status
        .parse::<OrderStatus>()
        .map_err(|e| CommandError::InvalidArgument("status", e.to_string()))?;
    Ok((id, status))
}

/// Write a new status to one order, whatever its current status.
///
/// # Errors
///
/// Returns an error if the arguments don't parse, the backend isn't
/// configured, or no order has this id.
pub async fn set_status(id: &str, status: &str) -> Result<(), CommandError> {
    let (id, status) = parse_args(id, status)?;
    let client = service_client()?;

    OrderRepository::new(&client)
        .set_status(id, status, Utc::now())
        .await?;

    tracing::info!(order_id = %id, status = %status, "Order status updated");
    Ok(())
}
