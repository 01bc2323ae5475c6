//! Storefront backend client against the mock backend.

#![allow(clippy::unwrap_used)]

use bazaar_core::{CartOwner, GuestId, ProductId, UserId};
use bazaar_integration_tests::{MockBackend, SHOPPER_EMAIL, SHOPPER_PASSWORD};
use bazaar_storefront::api::{ApiClient, CartItemInput};

fn item(product: &str, size: &str, color: &str, quantity: u32) -> CartItemInput {
    CartItemInput {
        product_id: ProductId::new(product),
        size: size.to_string(),
        color: color.to_string(),
        quantity,
    }
}

#[tokio::test]
async fn test_missing_cart_reads_as_empty() {
    let backend = MockBackend::spawn().await;
    let api = ApiClient::new(&backend.url()).unwrap();

    let cart = api
        .get_cart(&CartOwner::Guest(GuestId::new("guest_1_none")))
        .await
        .unwrap();
    assert!(cart.is_empty());
}

#[tokio::test]
async fn test_cart_mutations_return_whole_cart() {
    let backend = MockBackend::spawn().await;
    let api = ApiClient::new(&backend.url()).unwrap();
    let owner = CartOwner::Guest(GuestId::new("guest_1_ab"));

    api.add_to_cart(&owner, &item("p1", "M", "Blue", 1)).await.unwrap();
    let cart = api.add_to_cart(&owner, &item("p1", "M", "Blue", 2)).await.unwrap();
    assert_eq!(cart.item_count(), 3);
    assert_eq!(cart.products.len(), 1);

    let cart = api
        .update_cart_quantity(&owner, &item("p1", "M", "Blue", 1))
        .await
        .unwrap();
    assert_eq!(cart.item_count(), 1);

    let cart = api
        .remove_from_cart(&owner, &item("p1", "M", "Blue", 0))
        .await
        .unwrap();
    assert!(cart.is_empty());
}

#[tokio::test]
async fn test_backend_message_is_surfaced() {
    let backend = MockBackend::spawn().await;
    let api = ApiClient::new(&backend.url()).unwrap();

    let err = api.login(SHOPPER_EMAIL, "wrong").await.unwrap_err();
    assert_eq!(err.user_message("fallback"), "Invalid email or password");

    let err = api.get_product(&ProductId::new("missing")).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_merge_moves_guest_lines_to_user() {
    let backend = MockBackend::spawn().await;
    let api = ApiClient::new(&backend.url()).unwrap();
    let guest = GuestId::new("guest_1_cd");

    api.add_to_cart(&CartOwner::Guest(guest.clone()), &item("p2", "32", "Khaki", 2))
        .await
        .unwrap();

    let login = api.login(SHOPPER_EMAIL, SHOPPER_PASSWORD).await.unwrap();
    let token = bazaar_core::store::BearerToken::new(login.token);
    api.merge_cart(&guest, &login.user, &token).await.unwrap();

    let cart = api
        .get_cart(&CartOwner::User(UserId::new("u1")))
        .await
        .unwrap();
    assert_eq!(cart.item_count(), 2);
    assert!(backend.was_called("POST /api/cart/merge"));
}
