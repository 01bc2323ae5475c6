//! Storefront pages and fragments driven in-process against the mock backend.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::json;
use bazaar_integration_tests::{
    MockBackend, SHOPPER_EMAIL, SHOPPER_PASSWORD, TestClient, storefront_app,
};

const ADD_SHIRT: &[(&str, &str)] = &[
    ("product_id", "p1"),
    ("size", "M"),
    ("color", "Blue"),
    ("quantity", "1"),
];

#[tokio::test]
async fn test_add_to_cart_updates_badge() {
    let backend = MockBackend::spawn().await;
    let mut client = TestClient::new(storefront_app(&backend));

    let response = client.post_form("/cart/add", ADD_SHIRT).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains(r#"<span class="badge">1</span>"#));
    let trigger = response.header("hx-trigger").unwrap();
    assert!(trigger.contains("cart-updated"));
    assert!(trigger.contains("Product added to cart!"));

    client.post_form("/cart/add", ADD_SHIRT).await;
    let count = client.get_htmx("/cart/count").await;
    assert!(count.body.contains(r#"<span class="badge">2</span>"#));
}

#[tokio::test]
async fn test_add_without_variant_is_rejected() {
    let backend = MockBackend::spawn().await;
    let mut client = TestClient::new(storefront_app(&backend));

    let response = client
        .post_form("/cart/add", &[("product_id", "p1"), ("size", ""), ("color", "")])
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(!backend.was_called("POST /api/cart"));
}

#[tokio::test]
async fn test_remove_empties_cart() {
    let backend = MockBackend::spawn().await;
    let mut client = TestClient::new(storefront_app(&backend));

    client.post_form("/cart/add", ADD_SHIRT).await;
    let response = client
        .post_form(
            "/cart/remove",
            &[("product_id", "p1"), ("size", "M"), ("color", "Blue")],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(!response.body.contains("Oxford Shirt"));

    let count = client.get_htmx("/cart/count").await;
    assert!(!count.body.contains("badge"));
}

#[tokio::test]
async fn test_login_merges_guest_cart() {
    let backend = MockBackend::spawn().await;
    let mut client = TestClient::new(storefront_app(&backend));

    client.post_form("/cart/add", ADD_SHIRT).await;
    let response = client
        .post_form(
            "/auth/login",
            &[
                ("email", SHOPPER_EMAIL),
                ("password", SHOPPER_PASSWORD),
                ("redirect", "/cart"),
            ],
        )
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/cart"));
    assert!(backend.was_called("POST /api/cart/merge"));
    assert!(backend.data().carts.contains_key("user:u1"));

    // The session now holds the user's re-fetched cart
    let count = client.get_htmx("/cart/count").await;
    assert!(count.body.contains(r#"<span class="badge">1</span>"#));
}

#[tokio::test]
async fn test_bad_login_shows_backend_message() {
    let backend = MockBackend::spawn().await;
    let mut client = TestClient::new(storefront_app(&backend));

    let response = client
        .post_form("/auth/login", &[("email", SHOPPER_EMAIL), ("password", "nope")])
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(response.body.contains("Invalid email or password"));
}

#[tokio::test]
async fn test_checkout_requires_login() {
    let backend = MockBackend::spawn().await;
    let mut client = TestClient::new(storefront_app(&backend));

    let response = client.get("/checkout").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/auth/login?redirect=%2Fcheckout"));
}

#[tokio::test]
async fn test_checkout_validation_blocks_submission() {
    let backend = MockBackend::spawn().await;
    let mut client = TestClient::new(storefront_app(&backend));

    client
        .post_form(
            "/auth/login",
            &[("email", SHOPPER_EMAIL), ("password", SHOPPER_PASSWORD)],
        )
        .await;

    let empty = client
        .post_form("/checkout", &[("email", SHOPPER_EMAIL), ("first_name", "Sam")])
        .await;
    assert_eq!(empty.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(empty.body.contains("Your cart is empty!"));

    client.post_form("/cart/add", ADD_SHIRT).await;
    let missing = client
        .post_form("/checkout", &[("email", SHOPPER_EMAIL), ("first_name", "Sam")])
        .await;
    assert_eq!(missing.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(!backend.was_called("POST /api/checkout"));
}

#[tokio::test]
async fn test_zero_quantity_removes_line() {
    let backend = MockBackend::spawn().await;
    let mut client = TestClient::new(storefront_app(&backend));

    client.post_form("/cart/add", ADD_SHIRT).await;
    let response = client
        .post_form(
            "/cart/update",
            &[
                ("product_id", "p1"),
                ("size", "M"),
                ("color", "Blue"),
                ("quantity", "0"),
            ],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(backend.was_called("DELETE /api/cart"));
    assert!(!backend.was_called("PUT /api/cart"));
    assert!(!response.body.contains("Oxford Shirt"));

    let count = client.get_htmx("/cart/count").await;
    assert!(!count.body.contains("badge"));
}

#[tokio::test]
async fn test_logout_forgets_cart() {
    let backend = MockBackend::spawn().await;
    let mut client = TestClient::new(storefront_app(&backend));

    client.post_form("/cart/add", ADD_SHIRT).await;
    client
        .post_form(
            "/auth/login",
            &[("email", SHOPPER_EMAIL), ("password", SHOPPER_PASSWORD)],
        )
        .await;
    let count = client.get_htmx("/cart/count").await;
    assert!(count.body.contains(r#"<span class="badge">1</span>"#));

    let response = client.post_form("/auth/logout", &[]).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/"));

    let count = client.get_htmx("/cart/count").await;
    assert!(!count.body.contains("badge"));
    // The user's cart stays on the backend for their next login
    assert!(backend.data().carts.contains_key("user:u1"));
}

/// Log in, fill the cart and submit the shipping form; returns the id of
/// the checkout the backend created.
async fn start_checkout(backend: &MockBackend, client: &mut TestClient) -> String {
    client
        .post_form(
            "/auth/login",
            &[("email", SHOPPER_EMAIL), ("password", SHOPPER_PASSWORD)],
        )
        .await;
    client.post_form("/cart/add", ADD_SHIRT).await;

    let response = client
        .post_form(
            "/checkout",
            &[
                ("email", SHOPPER_EMAIL),
                ("first_name", "Sam"),
                ("address", "1 Main St"),
                ("city", "Springfield"),
                ("postal_code", "12345"),
                ("country", "US"),
            ],
        )
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/checkout"));

    let data = backend.data();
    let (owner, checkout) = data.checkouts.last().unwrap();
    assert_eq!(owner, "u1");
    assert_eq!(checkout.checkout_items.len(), 1);
    checkout.id.to_string()
}

#[tokio::test]
async fn test_capture_finalizes_order_and_empties_cart() {
    let backend = MockBackend::spawn().await;
    let mut client = TestClient::new(storefront_app(&backend));
    let id = start_checkout(&backend, &mut client).await;

    let page = client.get("/checkout").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains(&id));

    let response = client
        .post_json(
            &format!("/checkout/{id}/capture"),
            &json!({"details": {"id": "PAYID-1", "status": "COMPLETED"}}),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let order_id = backend.data().orders.last().unwrap().id.to_string();
    let reply: serde_json::Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(
        reply["redirect"],
        format!("/order-confirmation/{order_id}")
    );

    let calls = backend.data().calls.clone();
    let pay = calls
        .iter()
        .position(|call| *call == format!("PUT /api/checkout/{id}/pay"))
        .unwrap();
    let finalize = calls
        .iter()
        .position(|call| *call == format!("POST /api/checkout/{id}/finalize"))
        .unwrap();
    assert!(pay < finalize);

    let count = client.get_htmx("/cart/count").await;
    assert!(!count.body.contains("badge"));

    // With the cart gone the checkout page sends the shopper back to it
    let checkout = client.get("/checkout").await;
    assert_eq!(checkout.status, StatusCode::SEE_OTHER);
    assert_eq!(checkout.location(), Some("/cart"));
}

#[tokio::test]
async fn test_capture_of_unknown_checkout_is_not_found() {
    let backend = MockBackend::spawn().await;
    let mut client = TestClient::new(storefront_app(&backend));
    start_checkout(&backend, &mut client).await;

    let response = client
        .post_json("/checkout/c999/capture", &json!({"details": {}}))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    let reply: serde_json::Value = serde_json::from_str(&response.body).unwrap();
    assert!(reply["error"].is_string());
    assert!(!backend.was_called("PUT /api/checkout/c999/pay"));
    assert_eq!(backend.data().orders.len(), 2);
}
