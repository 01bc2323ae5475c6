//! Admin console driven in-process against the mock backend.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use bazaar_integration_tests::{
    ADMIN_EMAIL, ADMIN_PASSWORD, MockBackend, SHOPPER_EMAIL, SHOPPER_PASSWORD, TestClient,
    admin_app,
};

async fn signed_in(backend: &MockBackend) -> TestClient {
    let mut client = TestClient::new(admin_app(backend));
    let response = client
        .post_form(
            "/auth/login",
            &[("email", ADMIN_EMAIL), ("password", ADMIN_PASSWORD)],
        )
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/"));
    client
}

#[tokio::test]
async fn test_pages_require_admin_session() {
    let backend = MockBackend::spawn().await;
    let mut client = TestClient::new(admin_app(&backend));

    let page = client.get("/orders").await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(page.location(), Some("/auth/login"));

    let fragment = client.get_htmx("/dashboard/metrics").await;
    assert_eq!(fragment.status, StatusCode::UNAUTHORIZED);
    assert_eq!(fragment.header("hx-redirect"), Some("/auth/login"));
}

#[tokio::test]
async fn test_customer_cannot_sign_in() {
    let backend = MockBackend::spawn().await;
    let mut client = TestClient::new(admin_app(&backend));

    let response = client
        .post_form(
            "/auth/login",
            &[("email", SHOPPER_EMAIL), ("password", SHOPPER_PASSWORD)],
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let page = client.get("/").await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_dashboard_shows_totals() {
    let backend = MockBackend::spawn().await;
    let mut client = signed_in(&backend).await;

    let page = client.get("/").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("$95.00"));
    assert!(page.body.contains(r#"hx-trigger="every 10s""#));
    assert!(page.body.contains("Sam Shopper"));
}

#[tokio::test]
async fn test_status_change_returns_only_that_row() {
    let backend = MockBackend::spawn().await;
    let mut client = signed_in(&backend).await;
    client.get("/orders").await;

    let response = client
        .post_form("/orders/665f00aa11bb22cc/status", &[("status", "Delivered")])
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body.matches("<tr").count(), 1);
    assert!(response.body.contains(r#"id="order-665f00aa11bb22cc""#));
    assert!(response.body.contains(r#"<option value="Delivered" selected>"#));
    assert!(response.header("hx-trigger").unwrap().contains("Order marked Delivered"));

    let invalid = client
        .post_form("/orders/665f00aa11bb22cc/status", &[("status", "Lost")])
        .await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_product_delete_removes_one_row() {
    let backend = MockBackend::spawn().await;
    let mut client = signed_in(&backend).await;

    let before = client.get("/products").await;
    assert!(before.body.contains(r#"id="product-p1""#));
    assert!(before.body.contains(r#"id="product-p2""#));

    let response = client.post_form("/products/p1/delete", &[]).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.is_empty());
    assert!(response.header("hx-trigger").unwrap().contains("Product deleted successfully"));

    let after = client.get("/products").await;
    assert!(!after.body.contains(r#"id="product-p1""#));
    assert!(after.body.contains(r#"id="product-p2""#));
}

#[tokio::test]
async fn test_create_product_appends_row() {
    let backend = MockBackend::spawn().await;
    let mut client = signed_in(&backend).await;

    let response = client
        .post_form(
            "/products",
            &[("name", "Linen Blazer"), ("price", "120"), ("sizes", "M, L")],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Linen Blazer"));
    assert!(response.body.contains("$120.00"));

    let missing = client.post_form("/products", &[("name", "No Price")]).await;
    assert_eq!(missing.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(backend.data().products.len(), 3);
}

#[tokio::test]
async fn test_admin_cannot_delete_self() {
    let backend = MockBackend::spawn().await;
    let mut client = signed_in(&backend).await;

    let response = client.post_form("/users/a1/delete", &[]).await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(!backend.was_called("DELETE /api/admin/users/a1"));
}
