//! Catalog endpoints.

use bazaar_core::ProductId;
use bazaar_core::catalog::{ProductFilters, similar_products};
use bazaar_core::models::Product;
use reqwest::Method;
use tracing::instrument;

use super::{ApiClient, ApiError};

impl ApiClient {
    /// `GET /api/products` with the given filters.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn list_products(&self, filters: &ProductFilters) -> Result<Vec<Product>, ApiError> {
        let request = self
            .request(Method::GET, "/api/products", None)?
            .query(&filters.to_query());
        self.send(request).await
    }

    /// `GET /api/products/featured`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn featured_products(&self) -> Result<Vec<Product>, ApiError> {
        let request = self.request(Method::GET, "/api/products/featured", None)?;
        self.send(request).await
    }

    /// `GET /api/products/{id}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the product does not exist.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, ApiError> {
        let path = format!("/api/products/{}", urlencoding::encode(id.as_str()));
        let request = self.request(Method::GET, &path, None)?;
        self.send(request).await
    }

    /// Products in the same category, excluding `product` itself.
    ///
    /// # Errors
    ///
    /// Returns an error if the category listing fails.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn similar_products(&self, product: &Product) -> Result<Vec<Product>, ApiError> {
        if product.category.is_empty() {
            return Ok(Vec::new());
        }
        let candidates = self
            .list_products(&ProductFilters::category(product.category.clone()))
            .await?;
        Ok(similar_products(product, candidates))
    }
}
