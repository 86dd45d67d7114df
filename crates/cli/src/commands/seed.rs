//! Demo catalog seeding.
//!
//! Inserts a small menu (categories, products, options and variations) into
//! the data backend so a fresh project has something to order. Ids are
//! generated here, so running it twice inserts a second copy.
//!
//! # Environment Variables
//!
//! - `BACKEND_URL` - Data backend base URL
//! - `BACKEND_SERVICE_KEY` - Service-role key (HIGH PRIVILEGE)

use forkful_backend::Table;
use forkful_core::{CategoryId, OptionId, ProductId, VariationId};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tracing::info;

use super::{CommandError, service_client};

/// Rows for each catalog table, parents before children.
#[derive(Debug, Default)]
pub struct DemoCatalog {
    pub categories: Vec<Value>,
    pub products: Vec<Value>,
    pub options: Vec<Value>,
    pub variations: Vec<Value>,
}

struct OptionSpec {
    title: &'static str,
    required: bool,
    max_selections: Option<u32>,
    variations: &'static [(&'static str, i64)],
}

struct ProductSpec {
    name: &'static str,
    description: &'static str,
    /// Price in cents.
    price: i64,
    options: &'static [OptionSpec],
}

const PIZZA_SIZE: OptionSpec = OptionSpec {
    title: "Size",
    required: true,
    max_selections: Some(1),
    variations: &[("Regular", 0), ("Large", 300)],
};

const PIZZA_EXTRAS: OptionSpec = OptionSpec {
    title: "Extras",
    required: false,
    max_selections: Some(3),
    variations: &[("Extra cheese", 250), ("Olives", 150), ("Basil", 100), ("Chili oil", 100)],
};

const MENU: &[(&str, &[ProductSpec])] = &[
    (
        "Pizzas",
        &[
            ProductSpec {
                name: "Margherita",
                description: "Tomato, mozzarella and fresh basil.",
                price: 1000,
                options: &[PIZZA_SIZE, PIZZA_EXTRAS],
            },
            ProductSpec {
                name: "Calabresa",
                description: "Smoked sausage, onion and oregano.",
                price: 1200,
                options: &[PIZZA_SIZE, PIZZA_EXTRAS],
            },
        ],
    ),
    (
        "Drinks",
        &[
            ProductSpec {
                name: "Lemonade",
                description: "Freshly squeezed, lightly sweetened.",
                price: 550,
                options: &[OptionSpec {
                    title: "Ice",
                    required: true,
                    max_selections: Some(1),
                    variations: &[("With ice", 0), ("No ice", 0)],
                }],
            },
            ProductSpec {
                name: "Sparkling water",
                description: "350 ml can.",
                price: 400,
                options: &[],
            },
        ],
    ),
];

/// Build the demo rows with fresh ids.
#[must_use]
pub fn build_demo_catalog() -> DemoCatalog {
    let mut catalog = DemoCatalog::default();

    for (position, (category, products)) in (0_i32..).zip(MENU.iter()) {
        let category_id = CategoryId::generate();
        catalog.categories.push(json!({
            "id": category_id,
            "name": category,
            "position": position,
        }));

        for product in *products {
            let product_id = ProductId::generate();
            catalog.products.push(json!({
                "id": product_id,
                "name": product.name,
                "description": product.description,
                "price": Decimal::new(product.price, 2),
                "category_id": category_id,
                "available": true,
            }));

            for (position, option) in (0_i32..).zip(product.options.iter()) {
                let option_id = OptionId::generate();
                catalog.options.push(json!({
                    "id": option_id,
                    "product_id": product_id,
                    "title": option.title,
                    "required": option.required,
                    "max_selections": option.max_selections,
                    "position": position,
                }));

                for (position, (name, delta)) in (0_i32..).zip(option.variations.iter()) {
                    catalog.variations.push(json!({
                        "id": VariationId::generate(),
                        "option_id": option_id,
                        "name": name,
                        "price": Decimal::new(*delta, 2),
                        "position": position,
                    }));
                }
            }
        }
    }

    catalog
}

/// Insert the demo catalog, one table at a time.
///
/// # Errors
///
/// Returns an error if the backend isn't configured or rejects a batch.
pub async fn demo_catalog() -> Result<(), CommandError> {
    let client = service_client()?;
    let catalog = build_demo_catalog();

    for (table, rows) in [
        (Table::Categories, &catalog.categories),
        (Table::Products, &catalog.products),
        (Table::ProductOptions, &catalog.options),
        (Table::OptionVariations, &catalog.variations),
    ] {
        let written: Vec<Value> = client.insert(table, rows.as_slice()).await?;
        info!(table = %table, rows = written.len(), "Seeded");
    }

    info!("Demo catalog ready");
    Ok(())
}
