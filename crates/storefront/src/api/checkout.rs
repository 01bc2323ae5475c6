//! Checkout endpoints: create, mark paid, finalize.

use bazaar_core::CheckoutId;
use bazaar_core::checkout::{CheckoutRequest, PaymentConfirmation};
use bazaar_core::models::{Checkout, Order};
use bazaar_core::store::BearerToken;
use reqwest::Method;
use tracing::instrument;

use super::{ApiClient, ApiError};

fn checkout_path(id: &CheckoutId, action: &str) -> String {
    format!(
        "/api/checkout/{}/{action}",
        urlencoding::encode(id.as_str())
    )
}

impl ApiClient {
    /// `POST /api/checkout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, token, body), fields(total = %body.total().display()))]
    pub async fn create_checkout(
        &self,
        token: &BearerToken,
        body: &CheckoutRequest,
    ) -> Result<Checkout, ApiError> {
        let request = self
            .request(Method::POST, "/api/checkout", Some(token))?
            .json(body);
        self.send(request).await
    }

    /// `PUT /api/checkout/{id}/pay`: relay the payment provider's result.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, token, confirmation), fields(checkout_id = %id))]
    pub async fn mark_checkout_paid(
        &self,
        token: &BearerToken,
        id: &CheckoutId,
        confirmation: &PaymentConfirmation,
    ) -> Result<(), ApiError> {
        let request = self
            .request(Method::PUT, &checkout_path(id, "pay"), Some(token))?
            .json(confirmation);
        self.send_discarding(request).await
    }

    /// `POST /api/checkout/{id}/finalize`: turn a paid checkout into an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, token), fields(checkout_id = %id))]
    pub async fn finalize_checkout(
        &self,
        token: &BearerToken,
        id: &CheckoutId,
    ) -> Result<Order, ApiError> {
        let request = self.request(Method::POST, &checkout_path(id, "finalize"), Some(token))?;
        self.send(request).await
    }
}
