//! End-to-end tests for the storefront.
//!
//! These tests require:
//! - A migrated session database (`forkful-cli migrate`)
//! - A seeded backend (`forkful-cli seed`)
//! - The storefront running (`cargo run -p forkful-storefront`)
//!
//! Run with: cargo test -p forkful-integration-tests -- --ignored

use forkful_integration_tests::{
    DEMO_PRODUCT, add_form, browser, catalog_backend, find_product, place_demo_order,
    storefront_url,
};
use reqwest::StatusCode;
use reqwest::header::LOCATION;

#[tokio::test]
#[ignore = "Requires running storefront"]
async fn test_health() {
    let resp = browser()
        .expect("client")
        .get(format!("{}/health", storefront_url()))
        .send()
        .await
        .expect("Failed to reach storefront");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.expect("body"), "ok");
}

#[tokio::test]
#[ignore = "Requires running storefront and seeded backend"]
async fn test_menu_lists_demo_product() {
    let body = browser()
        .expect("client")
        .get(format!("{}/?q=marg", storefront_url()))
        .send()
        .await
        .expect("Failed to load menu")
        .text()
        .await
        .expect("body");

    assert!(body.contains(DEMO_PRODUCT));
}

#[tokio::test]
#[ignore = "Requires running storefront and seeded backend"]
async fn test_quote_adds_variation_deltas() {
    let backend = catalog_backend().expect("backend env");
    let (product, options) = find_product(&backend, DEMO_PRODUCT).await.expect("product");

    // Seeded Margherita: 10.00 base, Large adds 3.00
    let resp = browser()
        .expect("client")
        .post(format!("{}/products/{}/quote", storefront_url(), product.id))
        .form(&add_form(&product, &options, 2))
        .send()
        .await
        .expect("Failed to get quote");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("body");
    assert!(body.contains("R$ 26.00"), "total missing: {body}");
    assert!(body.contains("R$ 13.00"), "unit price missing: {body}");
}

#[tokio::test]
#[ignore = "Requires running storefront and seeded backend"]
async fn test_add_without_required_option_is_rejected() {
    let backend = catalog_backend().expect("backend env");
    let (product, _) = find_product(&backend, DEMO_PRODUCT).await.expect("product");
    let client = browser().expect("client");
    let base = storefront_url();

    let resp = client
        .post(format!("{base}/cart/add"))
        .form(&[("product_id", product.id.to_string()), ("quantity", "1".to_string())])
        .send()
        .await
        .expect("Failed to post add");

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get("HX-Trigger").is_none());
    let body = resp.text().await.expect("body");
    assert!(body.contains("Please choose an option for"));

    let count = client
        .get(format!("{base}/cart/count"))
        .send()
        .await
        .expect("Failed to get count")
        .text()
        .await
        .expect("body");
    assert!(count.contains(">0<"));
}

#[tokio::test]
#[ignore = "Requires running storefront"]
async fn test_checkout_with_empty_cart_redirects() {
    let resp = browser()
        .expect("client")
        .get(format!("{}/checkout", storefront_url()))
        .send()
        .await
        .expect("Failed to load checkout");

    assert!(resp.status().is_redirection());
    assert_eq!(resp.headers()[LOCATION], "/cart");
}

#[tokio::test]
#[ignore = "Requires running storefront and seeded backend"]
async fn test_checkout_places_pending_order() {
    let client = browser().expect("client");
    let base = storefront_url();

    let id = place_demo_order(&client).await.expect("checkout");

    let body = client
        .get(format!("{base}/orders/{id}"))
        .send()
        .await
        .expect("Failed to load order")
        .text()
        .await
        .expect("body");
    assert!(body.contains("Pending"));
    assert!(body.contains("R$ 26.00"));
    assert!(body.contains("Rua Augusta, 1500"));

    // Cart was emptied
    let resp = client
        .get(format!("{base}/checkout"))
        .send()
        .await
        .expect("Failed to load checkout");
    assert!(resp.status().is_redirection());

    let resp = client
        .get(format!("{base}/orders/{id}/status"))
        .send()
        .await
        .expect("Failed to poll status");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running storefront and seeded backend"]
async fn test_orders_are_private_to_their_session() {
    let owner = browser().expect("client");
    let id = place_demo_order(&owner).await.expect("checkout");

    let resp = browser()
        .expect("client")
        .get(format!("{}/orders/{id}", storefront_url()))
        .send()
        .await
        .expect("Failed to load order");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
