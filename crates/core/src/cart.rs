//! Visitor cart held in the session until checkout.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::order::LineItem;
use crate::types::{CartItemId, ProductId};

/// One line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Synthetic id; two lines for the same product stay distinct.
    pub id: CartItemId,
    pub product_id: ProductId,
    pub name: String,
    /// Base price plus the deltas of the chosen variations.
    pub unit_price: Decimal,
    pub quantity: u32,
    pub image: Option<String>,
    /// Option title to chosen variation names.
    #[serde(default)]
    pub options: BTreeMap<String, Vec<String>>,
    /// `unit_price × quantity`.
    pub total_price: Decimal,
}

impl CartItem {
    /// Build a line with a fresh id and its total computed.
    #[must_use]
    pub fn new(
        product_id: ProductId,
        name: String,
        unit_price: Decimal,
        quantity: u32,
        image: Option<String>,
        options: BTreeMap<String, Vec<String>>,
    ) -> Self {
        Self {
            id: CartItemId::generate(),
            product_id,
            name,
            unit_price,
            quantity,
            image,
            options,
            total_price: unit_price * Decimal::from(quantity),
        }
    }

    /// Chosen options flattened to `"Title: Name"` strings.
    #[must_use]
    pub fn option_labels(&self) -> Vec<String> {
        self.options
            .iter()
            .flat_map(|(title, names)| names.iter().map(move |name| format!("{title}: {name}")))
            .collect()
    }

    fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
        self.total_price = self.unit_price * Decimal::from(quantity);
    }
}

/// The cart itself. Serialized into the visitor's session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Append a line. Lines are never merged, even for identical selections.
    pub fn add(&mut self, item: CartItem) -> CartItemId {
        let id = item.id;
        self.items.push(item);
        id
    }

    /// Set a line's quantity; zero removes it.
    ///
    /// Returns `false` when no line has that id.
    pub fn update_quantity(&mut self, id: CartItemId, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove(id);
        }
        match self.items.iter_mut().find(|i| i.id == id) {
            Some(item) => {
                item.set_quantity(quantity);
                true
            }
            None => false,
        }
    }

    /// Remove a line. Returns `false` when no line has that id.
    pub fn remove(&mut self, id: CartItemId) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.id != id);
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of line totals.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(|i| i.total_price).sum()
    }

    /// Total units across all lines (for the header badge).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Snapshot the cart as order line items.
    #[must_use]
    pub fn to_line_items(&self) -> Vec<LineItem> {
        self.items
            .iter()
            .map(|item| LineItem {
                product_id: Some(item.product_id),
                quantity: item.quantity,
                options: item.option_labels(),
                name: Some(item.name.clone()),
                unit_price: Some(item.unit_price),
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn item(price: &str, quantity: u32) -> CartItem {
        CartItem::new(
            ProductId::generate(),
            "Margherita".into(),
            price.parse().unwrap(),
            quantity,
            None,
            BTreeMap::from([("Size".to_string(), vec!["Large".to_string()])]),
        )
    }

    #[test]
    fn test_add_never_merges() {
        let mut cart = Cart::default();
        let first = item("13.00", 1);
        let mut second = first.clone();
        second.id = CartItemId::generate();

        cart.add(first);
        cart.add(second);
        assert_eq!(cart.items.len(), 2);
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_update_quantity_keeps_total_consistent() {
        let mut cart = Cart::default();
        let id = cart.add(item("13.00", 2));
        assert_eq!(cart.subtotal(), "26.00".parse::<Decimal>().unwrap());

        for qty in [1, 3, 10] {
            assert!(cart.update_quantity(id, qty));
            let line = &cart.items[0];
            assert_eq!(line.total_price, line.unit_price * Decimal::from(qty));
        }
    }

    #[test]
    fn test_update_quantity_zero_removes() {
        let mut cart = Cart::default();
        let id = cart.add(item("5.00", 1));
        cart.add(item("7.00", 1));
        assert!(cart.update_quantity(id, 0));
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.subtotal(), "7.00".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_unknown_id() {
        let mut cart = Cart::default();
        cart.add(item("5.00", 1));
        assert!(!cart.update_quantity(CartItemId::generate(), 2));
        assert!(!cart.remove(CartItemId::generate()));
        assert_eq!(cart.items.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::default();
        cart.add(item("5.00", 1));
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Decimal::ZERO);
    }

    #[test]
    fn test_to_line_items_snapshot() {
        let mut cart = Cart::default();
        cart.add(item("13.00", 2));
        let lines = cart.to_line_items();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 2);
        assert_eq!(lines[0].options, ["Size: Large"]);
        assert_eq!(lines[0].name.as_deref(), Some("Margherita"));
        assert_eq!(lines[0].line_total(), Some("26.00".parse().unwrap()));
    }
}
