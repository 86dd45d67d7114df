//! Shared helpers for the Forkful end-to-end tests.
//!
//! # Running Tests
//!
//! ```bash
//! # Session table and demo menu
//! cargo run -p forkful-cli -- migrate
//! cargo run -p forkful-cli -- seed
//!
//! # Both servers, then the ignored tests
//! cargo run -p forkful-storefront &
//! cargo run -p forkful-admin &
//! cargo test -p forkful-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_BASE_URL` (default `http://localhost:3000`)
//! - `ADMIN_BASE_URL` (default `http://localhost:3001`)
//! - `BACKEND_URL`, `BACKEND_ANON_KEY` - read the catalog to build add-to-cart forms

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::error::Error;

use forkful_backend::repo::{CatalogRepository, ProductFilter};
use forkful_backend::{BackendClient, BackendConfig};
use forkful_core::{OrderId, Product, ProductOption};
use reqwest::{Client, StatusCode, header::LOCATION, redirect::Policy};
use secrecy::SecretString;
use url::Url;

pub type TestResult<T = ()> = Result<T, Box<dyn Error + Send + Sync>>;

/// Seeded product every flow orders.
pub const DEMO_PRODUCT: &str = "Margherita";

/// Storefront base URL.
#[must_use]
pub fn storefront_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Admin base URL.
#[must_use]
pub fn admin_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// A client with its own cookie jar (one storefront session) that doesn't
/// follow redirects, so tests can assert on `Location`.
///
/// # Errors
///
/// Returns an error if the TLS backend can't be initialized.
pub fn browser() -> reqwest::Result<Client> {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
}

/// Backend client with the public key, for reading the catalog.
///
/// # Errors
///
/// Returns an error if `BACKEND_URL` or `BACKEND_ANON_KEY` is missing or invalid.
pub fn catalog_backend() -> TestResult<BackendClient> {
    let url = Url::parse(&std::env::var("BACKEND_URL")?)?;
    let key = SecretString::from(std::env::var("BACKEND_ANON_KEY")?);
    Ok(BackendClient::new(&BackendConfig::new(url, key))?)
}

/// Look up a seeded product and its options by name.
///
/// # Errors
///
/// Returns an error if the backend call fails or no product has this name.
pub async fn find_product(
    backend: &BackendClient,
    name: &str,
) -> TestResult<(Product, Vec<ProductOption>)> {
    let catalog = CatalogRepository::new(backend);
    let filter = ProductFilter {
        category: None,
        search: Some(name.to_string()),
    };
    let product = catalog
        .products(&filter)
        .await?
        .into_iter()
        .find(|p| p.name == name)
        .ok_or_else(|| format!("{name} not found; run `forkful-cli seed`"))?;
    let options = catalog.options(product.id).await?;
    Ok((product, options))
}

/// Form pairs for adding `quantity` of `product`, taking the last variation
/// of every required option.
#[must_use]
pub fn add_form(
    product: &Product,
    options: &[ProductOption],
    quantity: u32,
) -> Vec<(String, String)> {
    let mut pairs = vec![
        ("product_id".to_string(), product.id.to_string()),
        ("quantity".to_string(), quantity.to_string()),
    ];
    for option in options.iter().filter(|o| o.required) {
        if let Some(variation) = option.variations.last() {
            pairs.push((format!("option:{}", option.id), variation.id.to_string()));
        }
    }
    pairs
}

/// Checkout form for a fictional customer.
#[must_use]
pub fn checkout_form(phone: &str) -> Vec<(&'static str, String)> {
    vec![
        ("full_name", "Integration Test".to_string()),
        ("phone", phone.to_string()),
        ("street", "Rua Augusta".to_string()),
        ("number", "1500".to_string()),
        ("neighborhood", "Consolação".to_string()),
        ("city", "São Paulo".to_string()),
        ("state", "SP".to_string()),
        ("zip", String::new()),
    ]
}

/// Order id from a `/orders/{id}` redirect target.
#[must_use]
pub fn order_id_from_location(location: &str) -> Option<OrderId> {
    location.strip_prefix("/orders/")?.parse().ok()
}

/// Put the demo product in `browser`'s cart and check out.
///
/// # Errors
///
/// Returns an error if any step fails or checkout doesn't redirect to an order.
pub async fn place_demo_order(browser: &Client) -> TestResult<OrderId> {
    let backend = catalog_backend()?;
    let (product, options) = find_product(&backend, DEMO_PRODUCT).await?;
    let base = storefront_url();

    let resp = browser
        .post(format!("{base}/cart/add"))
        .form(&add_form(&product, &options, 2))
        .send()
        .await?;
    if resp.status() != StatusCode::OK {
        return Err(format!("add to cart returned {}", resp.status()).into());
    }

    let resp = browser
        .post(format!("{base}/checkout"))
        .form(&checkout_form("(11) 90000-0000"))
        .send()
        .await?;
    let location = resp
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| format!("checkout returned {} without a redirect", resp.status()))?;

    order_id_from_location(location)
        .ok_or_else(|| format!("unexpected redirect: {location}").into())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_id_from_location() {
        let id = OrderId::generate();
        assert_eq!(order_id_from_location(&format!("/orders/{id}")), Some(id));
        assert_eq!(order_id_from_location("/cart"), None);
        assert_eq!(order_id_from_location("/orders/not-a-uuid"), None);
    }

    #[test]
    fn test_checkout_form_has_every_field() {
        let form = checkout_form("11987654321");
        assert_eq!(form.len(), 8);
        assert!(form.iter().any(|(k, v)| *k == "phone" && v == "11987654321"));
    }
}
