//! Coercion of loosely-typed backend fields into the shapes the views expect.
//!
//! The `orders.items` and `orders.address` columns are JSON, but rows written
//! by older clients stored them as JSON *text*, sometimes with missing keys or
//! numbers where strings belong. Nothing here returns an error: bad input
//! degrades to the empty default and is logged at `debug`.

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use tracing::debug;

use crate::order::{Address, LineItem, Order, OrderRow};
use crate::types::{OrderStatus, ProductId};

/// Decode a value that may hold JSON-encoded text.
///
/// Structured values pass through untouched. Strings are parsed once; a string
/// that isn't valid JSON yields `None`.
fn decode(raw: &Value, field: &'static str) -> Option<Value> {
    match raw {
        Value::Null => None,
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!(field, error = %e, "Discarding unparseable JSON text");
                None
            }
        },
        other => Some(other.clone()),
    }
}

/// Coerce a raw `address` value into the full six-field shape.
///
/// Strings are kept, numbers are stringified, anything else (or a missing
/// key) becomes an empty string. Absent or malformed input yields
/// [`Address::default`].
///
/// ```
/// use forkful_core::normalize::normalize_address;
/// use serde_json::json;
///
/// let address = normalize_address(Some(&json!(r#"{"street":"Rua A","number":12}"#)));
/// assert_eq!(address.street, "Rua A");
/// assert_eq!(address.number, "12");
/// assert_eq!(address.zip, "");
/// ```
#[must_use]
pub fn normalize_address(raw: Option<&Value>) -> Address {
    let Some(value) = raw.and_then(|v| decode(v, "address")) else {
        return Address::default();
    };

    let Value::Object(map) = value else {
        debug!("Address is not an object, using empty address");
        return Address::default();
    };

    let field = |key: &str| -> String {
        match map.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        }
    };

    Address {
        street: field("street"),
        number: field("number"),
        neighborhood: field("neighborhood"),
        city: field("city"),
        state: field("state"),
        zip: field("zip"),
    }
}

/// Coerce a raw `items` value into a list of line items.
///
/// Returns an empty list unless the (decoded) value is an array. Elements that
/// are not objects are skipped.
#[must_use]
pub fn normalize_items(raw: Option<&Value>) -> Vec<LineItem> {
    let Some(value) = raw.and_then(|v| decode(v, "items")) else {
        return Vec::new();
    };

    let Value::Array(elements) = value else {
        debug!("Items is not an array, using empty list");
        return Vec::new();
    };

    elements
        .iter()
        .filter_map(|element| match element {
            Value::Object(map) => Some(line_item(map)),
            other => {
                debug!(element = %other, "Skipping non-object line item");
                None
            }
        })
        .collect()
}

/// Map an unchecked status string onto the enumeration; unknown means pending.
#[must_use]
pub fn normalize_status(raw: Option<&str>) -> OrderStatus {
    match raw {
        Some(s) => s.parse().unwrap_or_else(|e| {
            debug!(error = %e, "Unknown order status, treating as pending");
            OrderStatus::Pending
        }),
        None => OrderStatus::Pending,
    }
}

fn line_item(map: &Map<String, Value>) -> LineItem {
    let product_id = map
        .get("product_id")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<ProductId>().ok());

    LineItem {
        product_id,
        quantity: quantity(map.get("quantity")),
        options: options(map.get("options")),
        name: map
            .get("name")
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(str::to_owned),
        unit_price: map.get("unit_price").and_then(decimal),
    }
}

/// Quantity from a non-negative integer or numeric string, kept as stored
/// (zero included).
///
/// A missing, negative, fractional or out-of-range value falls back to one:
/// the line was ordered, just with an unreadable count.
fn quantity(raw: Option<&Value>) -> u32 {
    let parsed = match raw {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed.and_then(|q| u32::try_from(q).ok()).unwrap_or(1)
}

/// Chosen option names.
///
/// Accepts a flat list of names or an object mapping option title to one name
/// or a list of names (flattened to `"Title: Name"`).
fn options(raw: Option<&Value>) -> Vec<String> {
    match raw {
        Some(Value::Array(values)) => values
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_owned)
            .collect(),
        Some(Value::Object(map)) => map
            .iter()
            .flat_map(|(title, chosen)| {
                let names: Vec<&str> = match chosen {
                    Value::String(s) => vec![s.as_str()],
                    Value::Array(list) => list.iter().filter_map(Value::as_str).collect(),
                    _ => Vec::new(),
                };
                names
                    .into_iter()
                    .map(move |name| format!("{title}: {name}"))
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn decimal(raw: &Value) -> Option<Decimal> {
    match raw {
        Value::Number(n) => n.to_string().parse().ok(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl OrderRow {
    /// Normalize this row into an [`Order`]. Never fails.
    #[must_use]
    pub fn normalize(self) -> Order {
        Order {
            id: self.id,
            user_id: self.user_id,
            items: normalize_items(self.items.as_ref()),
            address: normalize_address(self.address.as_ref()),
            status: normalize_status(self.status.as_deref()),
            total: self.total.unwrap_or(Decimal::ZERO),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        row.normalize()
    }
}
