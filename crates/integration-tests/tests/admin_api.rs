//! Admin backend client against the mock backend.

#![allow(clippy::unwrap_used)]

use bazaar_admin::api::{ApiClient, ImageUpload};
use bazaar_core::OrderStatus;
use bazaar_core::store::BearerToken;
use bazaar_core::types::OrderId;
use bazaar_integration_tests::{ADMIN_EMAIL, ADMIN_PASSWORD, MockBackend, SHOPPER_EMAIL, SHOPPER_PASSWORD};

async fn admin_token(api: &ApiClient) -> BearerToken {
    BearerToken::new(api.login(ADMIN_EMAIL, ADMIN_PASSWORD).await.unwrap().token)
}

#[tokio::test]
async fn test_status_update_returns_order() {
    let backend = MockBackend::spawn().await;
    let api = ApiClient::new(&backend.url()).unwrap();
    let token = admin_token(&api).await;

    let order = api
        .update_order_status(&token, &OrderId::new("665f00aa11bb22cc"), OrderStatus::Shipped)
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Shipped);

    let orders = api.list_all_orders(&token).await.unwrap();
    assert_eq!(orders.len(), 2);
}

#[tokio::test]
async fn test_customer_token_is_unauthorized() {
    let backend = MockBackend::spawn().await;
    let api = ApiClient::new(&backend.url()).unwrap();
    let login = api.login(SHOPPER_EMAIL, SHOPPER_PASSWORD).await.unwrap();

    let err = api
        .list_admin_products(&BearerToken::new(login.token))
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.user_message("fallback"), "Not authorized as an admin");
}

#[tokio::test]
async fn test_upload_returns_image_url() {
    let backend = MockBackend::spawn().await;
    let api = ApiClient::new(&backend.url()).unwrap();
    let token = admin_token(&api).await;

    let url = api
        .upload_image(
            &token,
            ImageUpload {
                file_name: "shirt.png".to_string(),
                content_type: Some("image/png".to_string()),
                bytes: vec![0x89, b'P', b'N', b'G'],
            },
        )
        .await
        .unwrap();
    assert_eq!(url, "https://cdn.example.com/shirt.png");
    assert_eq!(backend.data().uploads, ["shirt.png"]);
}

#[tokio::test]
async fn test_delete_missing_order_is_not_found() {
    let backend = MockBackend::spawn().await;
    let api = ApiClient::new(&backend.url()).unwrap();
    let token = admin_token(&api).await;

    let err = api
        .delete_order(&token, &OrderId::new("nope"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}
