use bazaar_core::OrderStatus;
use bazaar_core::models::Order;
use bazaar_core::store::BearerToken;
use bazaar_core::types::OrderId;
use reqwest::Method;
use serde::Serialize;
use tracing::instrument;

use super::{ApiClient, ApiError, segment};

#[derive(Serialize)]
struct StatusUpdate {
    status: OrderStatus,
}

impl ApiClient {
    /// Every order, with the customer populated.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the token is not an admin's.
    #[instrument(skip(self, token))]
    pub async fn list_all_orders(&self, token: &BearerToken) -> Result<Vec<Order>, ApiError> {
        let request = self.request(Method::GET, "/api/admin/orders", Some(token))?;
        self.send(request).await
    }

    /// `PUT /api/admin/orders/{id}` with `{status}`; returns the updated order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the change or the request fails.
    #[instrument(skip(self, token))]
    pub async fn update_order_status(
        &self,
        token: &BearerToken,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, ApiError> {
        let path = format!("/api/admin/orders/{}", segment(id.as_str()));
        let request = self
            .request(Method::PUT, &path, Some(token))?
            .json(&StatusUpdate { status });
        self.send(request).await
    }

    /// # Errors
    ///
    /// Returns an error if the backend refuses the deletion or the request
    /// fails.
    #[instrument(skip(self, token))]
    pub async fn delete_order(&self, token: &BearerToken, id: &OrderId) -> Result<(), ApiError> {
        let path = format!("/api/admin/orders/{}", segment(id.as_str()));
        let request = self.request(Method::DELETE, &path, Some(token))?;
        self.send_discarding(request).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_body_uses_backend_labels() {
        let body = serde_json::to_value(StatusUpdate {
            status: OrderStatus::Delivered,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"status": "Delivered"}));
    }
}
