//! Order status enumeration.
//!
//! The main flow is `pending → processing → delivering → delivered`, with
//! `cancelled` and `awaiting_payment` as side states. There is no transition
//! guard: an admin may move any order to any status directly.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a status string is not part of the enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid order status: {0}")]
pub struct ParseStatusError(pub String);

/// Order lifecycle status.
///
/// Stored in the backend as a snake_case string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Delivering,
    Delivered,
    Cancelled,
    AwaitingPayment,
}

impl OrderStatus {
    /// Every status, in the order they appear in admin filters and selects.
    pub const ALL: [Self; 6] = [
        Self::Pending,
        Self::AwaitingPayment,
        Self::Processing,
        Self::Delivering,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Backend representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Delivering => "delivering",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::AwaitingPayment => "awaiting_payment",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Delivering => "Out for delivery",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
            Self::AwaitingPayment => "Awaiting payment",
        }
    }

    /// CSS badge class used by both storefront and admin templates.
    #[must_use]
    pub const fn badge_class(self) -> &'static str {
        match self {
            Self::Pending | Self::AwaitingPayment => "badge badge-warning",
            Self::Processing | Self::Delivering => "badge badge-info",
            Self::Delivered => "badge badge-success",
            Self::Cancelled => "badge badge-destructive",
        }
    }

    /// Whether the order has left the active flow.
    #[must_use]
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "delivering" => Ok(Self::Delivering),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            "awaiting_payment" => Ok(Self::AwaitingPayment),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trips_through_str() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&OrderStatus::AwaitingPayment).unwrap();
        assert_eq!(json, "\"awaiting_payment\"");
    }

    #[test]
    fn test_unknown_status() {
        let err = "shipped".parse::<OrderStatus>().unwrap_err();
        assert_eq!(err.to_string(), "invalid order status: shipped");
    }

    #[test]
    fn test_final_states() {
        assert!(OrderStatus::Delivered.is_final());
        assert!(OrderStatus::Cancelled.is_final());
        assert!(!OrderStatus::Delivering.is_final());
    }
}
