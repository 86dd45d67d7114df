//! Catalog types: categories, products, options and variations.
//!
//! The `*Row` structs mirror backend rows as they arrive over the wire
//! (nullable columns, embedded relations). Converting a row into its view
//! model fills defaults and fixes display order, so handlers never deal with
//! `Option` soup.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CategoryId, OptionId, ProductId, VariationId};

// =============================================================================
// Categories
// =============================================================================

/// A product category (e.g. "Pizzas", "Drinks").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    /// Display order, ascending.
    #[serde(default)]
    pub position: i32,
}

// =============================================================================
// Products
// =============================================================================

/// A product as shown on the storefront.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Base price before option surcharges.
    pub price: Decimal,
    pub image_url: Option<String>,
    pub category_id: Option<CategoryId>,
    /// Empty when the product is uncategorized.
    pub category_name: String,
    pub available: bool,
}

/// Embedded `categories(name)` relation on a product row.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryRef {
    pub name: Option<String>,
}

/// Raw `products` row, optionally with the category relation embedded.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRow {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub categories: Option<CategoryRef>,
    #[serde(default)]
    pub available: Option<bool>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description.unwrap_or_default(),
            price: row.price.unwrap_or(Decimal::ZERO),
            image_url: row.image_url.filter(|url| !url.trim().is_empty()),
            category_id: row.category_id,
            category_name: row
                .categories
                .and_then(|c| c.name)
                .unwrap_or_default(),
            available: row.available.unwrap_or(true),
        }
    }
}

// =============================================================================
// Options & Variations
// =============================================================================

/// One selectable value within an option, carrying a price delta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variation {
    pub id: VariationId,
    pub name: String,
    /// Surcharge added to the product's base price (may be zero).
    pub price: Decimal,
}

/// A named choice group on a product (e.g. "Size", "Extras").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    pub id: OptionId,
    pub title: String,
    /// At least one variation must be chosen.
    pub required: bool,
    /// Cap on how many variations can be chosen; `None` means unlimited.
    pub max_selections: Option<u32>,
    /// Variations in display order.
    pub variations: Vec<Variation>,
}

impl ProductOption {
    /// Find a variation of this option by id.
    #[must_use]
    pub fn variation(&self, id: VariationId) -> Option<&Variation> {
        self.variations.iter().find(|v| v.id == id)
    }

    /// Whether the form should render this option as a single-choice group.
    #[must_use]
    pub fn is_single_choice(&self) -> bool {
        self.max_selections == Some(1)
    }
}

/// Raw `option_variations` row.
#[derive(Debug, Clone, Deserialize)]
pub struct VariationRow {
    pub id: VariationId,
    pub name: String,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub position: Option<i32>,
}

/// Raw `product_options` row with `option_variations` embedded.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductOptionRow {
    pub id: OptionId,
    pub title: String,
    #[serde(default)]
    pub required: Option<bool>,
    #[serde(default)]
    pub max_selections: Option<i32>,
    #[serde(default)]
    pub position: Option<i32>,
    #[serde(default)]
    pub option_variations: Option<Vec<VariationRow>>,
}

impl From<ProductOptionRow> for ProductOption {
    fn from(row: ProductOptionRow) -> Self {
        let mut variations = row.option_variations.unwrap_or_default();
        variations.sort_by_key(|v| v.position.unwrap_or(i32::MAX));

        Self {
            id: row.id,
            title: row.title,
            required: row.required.unwrap_or(false),
            // Non-positive caps are treated as "no cap".
            max_selections: row
                .max_selections
                .and_then(|max| u32::try_from(max).ok())
                .filter(|max| *max > 0),
            variations: variations
                .into_iter()
                .map(|v| Variation {
                    id: v.id,
                    name: v.name,
                    price: v.price.unwrap_or(Decimal::ZERO),
                })
                .collect(),
        }
    }
}

/// Convert option rows into view models, ordered by their `position` column.
#[must_use]
pub fn options_from_rows(mut rows: Vec<ProductOptionRow>) -> Vec<ProductOption> {
    rows.sort_by_key(|r| r.position.unwrap_or(i32::MAX));
    rows.into_iter().map(ProductOption::from).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_product_row_defaults() {
        let row: ProductRow = serde_json::from_value(json!({
            "id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "name": "Margherita",
            "description": null,
            "price": 42.5,
            "image_url": "  ",
            "categories": { "name": "Pizzas" }
        }))
        .unwrap();

        let product = Product::from(row);
        assert_eq!(product.description, "");
        assert_eq!(product.price, Decimal::new(425, 1));
        assert_eq!(product.image_url, None);
        assert_eq!(product.category_name, "Pizzas");
        assert!(product.available);
    }

    #[test]
    fn test_option_row_sorts_variations_and_caps() {
        let row: ProductOptionRow = serde_json::from_value(json!({
            "id": "00000000-0000-0000-0000-000000000001",
            "title": "Size",
            "required": true,
            "max_selections": 0,
            "option_variations": [
                { "id": "00000000-0000-0000-0000-0000000000b2", "name": "Large", "price": "8.00", "position": 2 },
                { "id": "00000000-0000-0000-0000-0000000000b1", "name": "Small", "price": null, "position": 1 }
            ]
        }))
        .unwrap();

        let option = ProductOption::from(row);
        assert!(option.required);
        assert_eq!(option.max_selections, None);
        let names: Vec<_> = option.variations.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, ["Small", "Large"]);
        assert_eq!(option.variations[0].price, Decimal::ZERO);
    }

    #[test]
    fn test_options_from_rows_orders_by_position() {
        let rows: Vec<ProductOptionRow> = serde_json::from_value(json!([
            { "id": "00000000-0000-0000-0000-000000000002", "title": "Extras", "position": 5 },
            { "id": "00000000-0000-0000-0000-000000000001", "title": "Size", "position": 1, "max_selections": 1 }
        ]))
        .unwrap();

        let options = options_from_rows(rows);
        assert_eq!(options[0].title, "Size");
        assert!(options[0].is_single_choice());
        assert!(options[1].variations.is_empty());
        assert!(!options[1].required);
    }
}
