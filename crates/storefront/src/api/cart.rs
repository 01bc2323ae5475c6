//! Cart endpoints.
//!
//! Every mutation answers with the whole cart, which replaces the cached
//! copy in the session.

use bazaar_core::models::{Cart, User};
use bazaar_core::store::BearerToken;
use bazaar_core::{CartOwner, GuestId, ProductId, UserId};
use reqwest::Method;
use serde::Serialize;
use tracing::instrument;

use super::{ApiClient, ApiError};

/// A product variant and quantity to put in (or set on) the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemInput {
    pub product_id: ProductId,
    pub size: String,
    pub color: String,
    pub quantity: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CartMutation<'a> {
    product_id: &'a ProductId,
    #[serde(skip_serializing_if = "Option::is_none")]
    quantity: Option<u32>,
    size: &'a str,
    color: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    guest_id: Option<&'a GuestId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<&'a UserId>,
}

impl<'a> CartMutation<'a> {
    fn new(owner: &'a CartOwner, item: &'a CartItemInput, quantity: Option<u32>) -> Self {
        Self {
            product_id: &item.product_id,
            quantity,
            size: &item.size,
            color: &item.color,
            guest_id: owner.guest_id(),
            user_id: owner.user_id(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MergeRequest<'a> {
    guest_id: &'a GuestId,
    user: &'a User,
}

fn owner_query(owner: &CartOwner) -> Vec<(&'static str, &str)> {
    match owner {
        CartOwner::User(id) => vec![("userId", id.as_str())],
        CartOwner::Guest(id) => vec![("guestId", id.as_str())],
    }
}

impl ApiClient {
    /// `GET /api/cart` for a user or guest. A missing cart is an empty one.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails for any reason other than the
    /// cart not existing yet.
    #[instrument(skip(self))]
    pub async fn get_cart(&self, owner: &CartOwner) -> Result<Cart, ApiError> {
        let request = self
            .request(Method::GET, "/api/cart", None)?
            .query(&owner_query(owner));
        match self.send(request).await {
            Err(err) if err.is_not_found() => Ok(Cart::default()),
            other => other,
        }
    }

    /// `POST /api/cart`: add `item.quantity` units of a variant.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn add_to_cart(
        &self,
        owner: &CartOwner,
        item: &CartItemInput,
    ) -> Result<Cart, ApiError> {
        let body = CartMutation::new(owner, item, Some(item.quantity));
        let request = self.request(Method::POST, "/api/cart", None)?.json(&body);
        self.send(request).await
    }

    /// `PUT /api/cart`: set the quantity of a line. The backend drops the
    /// line when the quantity reaches zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn update_cart_quantity(
        &self,
        owner: &CartOwner,
        item: &CartItemInput,
    ) -> Result<Cart, ApiError> {
        let body = CartMutation::new(owner, item, Some(item.quantity));
        let request = self.request(Method::PUT, "/api/cart", None)?.json(&body);
        self.send(request).await
    }

    /// `DELETE /api/cart`: remove a line entirely.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn remove_from_cart(
        &self,
        owner: &CartOwner,
        item: &CartItemInput,
    ) -> Result<Cart, ApiError> {
        let body = CartMutation::new(owner, item, None);
        let request = self.request(Method::DELETE, "/api/cart", None)?.json(&body);
        self.send(request).await
    }

    /// `POST /api/cart/merge`: fold the guest cart into the user's cart.
    ///
    /// Callers re-fetch the user's cart afterwards whatever the outcome.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, user, token), fields(user_id = %user.id))]
    pub async fn merge_cart(
        &self,
        guest_id: &GuestId,
        user: &User,
        token: &BearerToken,
    ) -> Result<(), ApiError> {
        let body = MergeRequest { guest_id, user };
        let request = self
            .request(Method::POST, "/api/cart/merge", Some(token))?
            .json(&body);
        self.send_discarding(request).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_mutation_body_uses_backend_names() {
        let owner = CartOwner::Guest(GuestId::new("guest_1_ab"));
        let item = CartItemInput {
            product_id: ProductId::new("p1"),
            size: "M".into(),
            color: "Red".into(),
            quantity: 2,
        };

        let json = serde_json::to_value(CartMutation::new(&owner, &item, Some(2))).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "productId": "p1",
                "quantity": 2,
                "size": "M",
                "color": "Red",
                "guestId": "guest_1_ab",
            })
        );
    }

    #[test]
    fn test_removal_body_omits_quantity() {
        let owner = CartOwner::User(UserId::new("u1"));
        let item = CartItemInput {
            product_id: ProductId::new("p1"),
            size: "M".into(),
            color: "Red".into(),
            quantity: 0,
        };

        let json = serde_json::to_value(CartMutation::new(&owner, &item, None)).unwrap();
        assert!(json.get("quantity").is_none());
        assert_eq!(json["userId"], "u1");
    }
}
