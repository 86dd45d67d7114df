//! Orders management route handlers.
//!
//! This module contains handlers for the order list, the detail dialog and
//! status changes.

mod actions;
mod detail;
mod list;
pub mod types;

pub use actions::{StatusForm, ToastTemplate, update_status};
pub use detail::{OrderDetailTemplate, show};
pub use list::{OrdersIndexTemplate, PER_PAGE, index};
pub use types::{OrderDetailView, OrderRowTemplate, OrderRowView, OrdersQuery};
