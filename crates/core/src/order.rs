//! Orders, line items, delivery addresses and customer profiles.
//!
//! [`OrderRow`] is what the backend returns: `items` and `address` are free-form
//! JSON (sometimes double-encoded as strings) and `status` is an unchecked
//! string. [`Order`] is the cleaned-up view model; see [`crate::normalize`]
//! for the conversion.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{OrderId, OrderStatus, ProductId, UserId};

// =============================================================================
// Address
// =============================================================================

/// Delivery address. Every field is present; missing parts are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub number: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl Address {
    /// True when no field carries any text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts().iter().all(|p| p.trim().is_empty())
    }

    /// Compact single-line rendering, skipping blank parts.
    ///
    /// ```
    /// use forkful_core::Address;
    ///
    /// let address = Address {
    ///     street: "Rua Augusta".into(),
    ///     number: "1500".into(),
    ///     city: "São Paulo".into(),
    ///     ..Address::default()
    /// };
    /// assert_eq!(address.one_line(), "Rua Augusta, 1500, São Paulo");
    /// ```
    #[must_use]
    pub fn one_line(&self) -> String {
        self.parts()
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn parts(&self) -> [&str; 6] {
        [
            &self.street,
            &self.number,
            &self.neighborhood,
            &self.city,
            &self.state,
            &self.zip,
        ]
    }
}

// =============================================================================
// Line items
// =============================================================================

/// One product line inside an order.
///
/// `name` and `unit_price` are snapshots written at checkout so the order stays
/// readable after the catalog changes. Older rows may lack them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: Option<ProductId>,
    pub quantity: u32,
    /// Chosen variation names, e.g. `["Size: Large", "Extras: Bacon"]`.
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Decimal>,
}

impl LineItem {
    /// `unit_price × quantity`, if the unit price was recorded.
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.unit_price.map(|p| p * Decimal::from(self.quantity))
    }
}

// =============================================================================
// Orders
// =============================================================================

/// A normalized order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: OrderId,
    pub user_id: Option<UserId>,
    pub items: Vec<LineItem>,
    pub address: Address,
    pub status: OrderStatus,
    pub total: Decimal,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Apply a status change locally, mirroring what the backend update wrote.
    ///
    /// Applying the same status twice leaves the order unchanged apart from
    /// `updated_at`.
    pub fn apply_status(&mut self, status: OrderStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = Some(now);
    }

    /// Sum of quantities across line items.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// First eight characters of the id, for compact display.
    #[must_use]
    pub fn short_id(&self) -> String {
        self.id.to_string().chars().take(8).collect()
    }
}

/// Raw `orders` row as returned by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderRow {
    pub id: OrderId,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub items: Option<serde_json::Value>,
    #[serde(default)]
    pub address: Option<serde_json::Value>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub total: Option<Decimal>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Insert payload for a new order.
#[derive(Debug, Clone, Serialize)]
pub struct NewOrder {
    pub user_id: UserId,
    pub items: Vec<LineItem>,
    pub address: Address,
    pub status: OrderStatus,
    pub total: Decimal,
}

/// Patch payload for a status change.
#[derive(Debug, Clone, Serialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Profiles
// =============================================================================

/// Customer profile, keyed by phone at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl Profile {
    /// Name to show in listings; falls back to the phone, then a placeholder.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .or_else(|| self.phone.as_deref().filter(|p| !p.is_empty()))
            .unwrap_or("Unknown customer")
    }
}

/// Upsert payload for a profile.
#[derive(Debug, Clone, Serialize)]
pub struct NewProfile {
    pub full_name: String,
    pub phone: String,
}
