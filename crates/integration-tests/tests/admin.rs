//! End-to-end tests for the admin panel.
//!
//! These tests require:
//! - A seeded backend (`forkful-cli seed`)
//! - Both servers running (`forkful-storefront` places the orders under test)
//!
//! Run with: cargo test -p forkful-integration-tests -- --ignored

use forkful_core::OrderId;
use forkful_integration_tests::{admin_url, browser, place_demo_order};
use reqwest::StatusCode;
use reqwest::header::LOCATION;

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_root_redirects_to_orders() {
    let resp = browser()
        .expect("client")
        .get(admin_url())
        .send()
        .await
        .expect("Failed to reach admin");

    assert!(resp.status().is_redirection());
    assert_eq!(resp.headers()[LOCATION], "/orders");
}

#[tokio::test]
#[ignore = "Requires running admin server and backend"]
async fn test_readiness() {
    let resp = browser()
        .expect("client")
        .get(format!("{}/health/ready", admin_url()))
        .send()
        .await
        .expect("Failed to reach admin");

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running admin server and backend"]
async fn test_list_filters() {
    let client = browser().expect("client");
    let base = admin_url();

    for query in ["", "?status=all", "?status=pending", "?status=delivering&page=2", "?status=bogus"] {
        let resp = client
            .get(format!("{base}/orders{query}"))
            .send()
            .await
            .expect("Failed to list orders");
        assert_eq!(resp.status(), StatusCode::OK, "query {query}");
    }
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_unknown_order_detail_is_not_found() {
    let client = browser().expect("client");
    let base = admin_url();

    let resp = client
        .get(format!("{base}/orders/not-a-uuid"))
        .send()
        .await
        .expect("Failed to get detail");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = client
        .get(format!("{base}/orders/{}", OrderId::generate()))
        .send()
        .await
        .expect("Failed to get detail");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires both servers and seeded backend"]
async fn test_status_change_returns_updated_row() {
    let id = place_demo_order(&browser().expect("client"))
        .await
        .expect("checkout");
    let client = browser().expect("client");
    let base = admin_url();

    // Same status twice: only the timestamp moves
    for _ in 0..2 {
        let resp = client
            .post(format!("{base}/orders/{id}/status"))
            .form(&[("status", "delivering")])
            .send()
            .await
            .expect("Failed to update status");

        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().get("HX-Retarget").is_none());
        let body = resp.text().await.expect("body");
        assert!(body.contains(&format!("id=\"order-{id}\"")));
        assert!(body.contains("Delivering"));
        assert!(body.contains("R$ 26.00"));
    }

    let detail = client
        .get(format!("{base}/orders/{id}"))
        .send()
        .await
        .expect("Failed to get detail")
        .text()
        .await
        .expect("body");
    assert!(detail.contains("Margherita"));
    assert!(detail.contains("Integration Test"));
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_failed_status_change_returns_toast() {
    let resp = browser()
        .expect("client")
        .post(format!("{}/orders/{}/status", admin_url(), OrderId::generate()))
        .form(&[("status", "shipped")])
        .send()
        .await
        .expect("Failed to post status");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["HX-Retarget"], "#toasts");
    assert_eq!(resp.headers()["HX-Reswap"], "beforeend");
    assert!(resp.text().await.expect("body").contains("toast-error"));
}
