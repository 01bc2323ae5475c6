//! Order history endpoints.

use bazaar_core::OrderId;
use bazaar_core::models::Order;
use bazaar_core::store::BearerToken;
use reqwest::Method;
use tracing::instrument;

use super::{ApiClient, ApiError};

impl ApiClient {
    /// `GET /api/orders/my-orders`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the token is rejected.
    #[instrument(skip(self, token))]
    pub async fn my_orders(&self, token: &BearerToken) -> Result<Vec<Order>, ApiError> {
        let request = self.request(Method::GET, "/api/orders/my-orders", Some(token))?;
        self.send(request).await
    }

    /// `GET /api/orders/{id}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the order is not visible to
    /// this user.
    #[instrument(skip(self, token), fields(order_id = %id))]
    pub async fn get_order(&self, token: &BearerToken, id: &OrderId) -> Result<Order, ApiError> {
        let path = format!("/api/orders/{}", urlencoding::encode(id.as_str()));
        let request = self.request(Method::GET, &path, Some(token))?;
        self.send(request).await
    }
}
