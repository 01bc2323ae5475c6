use bazaar_core::models::{Product, ProductInput};
use bazaar_core::store::BearerToken;
use bazaar_core::types::ProductId;
use reqwest::Method;
use tracing::instrument;

use super::{ApiClient, ApiError, segment};

impl ApiClient {
    /// All products, published or not.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the token is not an admin's.
    #[instrument(skip(self, token))]
    pub async fn list_admin_products(&self, token: &BearerToken) -> Result<Vec<Product>, ApiError> {
        let request = self.request(Method::GET, "/api/admin/products", Some(token))?;
        self.send(request).await
    }

    /// # Errors
    ///
    /// Returns an error if the backend rejects the product or the request
    /// fails.
    #[instrument(skip(self, token, product), fields(name = %product.name))]
    pub async fn create_product(
        &self,
        token: &BearerToken,
        product: &ProductInput,
    ) -> Result<Product, ApiError> {
        let request = self
            .request(Method::POST, "/api/admin/products", Some(token))?
            .json(product);
        self.send(request).await
    }

    /// # Errors
    ///
    /// Returns an error if the backend rejects the update or the request fails.
    #[instrument(skip(self, token, product))]
    pub async fn update_product(
        &self,
        token: &BearerToken,
        id: &ProductId,
        product: &ProductInput,
    ) -> Result<Product, ApiError> {
        let path = format!("/api/admin/products/{}", segment(id.as_str()));
        let request = self.request(Method::PUT, &path, Some(token))?.json(product);
        self.send(request).await
    }

    /// # Errors
    ///
    /// Returns an error if the backend refuses the deletion or the request
    /// fails.
    #[instrument(skip(self, token))]
    pub async fn delete_product(&self, token: &BearerToken, id: &ProductId) -> Result<(), ApiError> {
        let path = format!("/api/admin/products/{}", segment(id.as_str()));
        let request = self.request(Method::DELETE, &path, Some(token))?;
        self.send_discarding(request).await
    }
}
