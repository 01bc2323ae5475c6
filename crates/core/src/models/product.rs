use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// A product image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub discount_price: Option<Decimal>,
    #[serde(default)]
    pub count_in_stock: u32,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub collections: String,
    #[serde(default)]
    pub material: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub num_reviews: u32,
}

impl Product {
    /// Price shoppers pay: the discount price when one is set.
    #[must_use]
    pub fn effective_price(&self) -> Price {
        Price::usd(self.discount_price.unwrap_or(self.price))
    }

    /// The list price.
    #[must_use]
    pub const fn list_price(&self) -> Price {
        Price::usd(self.price)
    }

    /// First image, used for cards and cart lines.
    #[must_use]
    pub fn primary_image(&self) -> Option<&ProductImage> {
        self.images.first()
    }

    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.count_in_stock > 0
    }
}

/// Editable product fields, as the admin console sends them on create and
/// update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Sent as `null` when unset so an update clears a previous discount.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub discount_price: Option<Decimal>,
    #[serde(default)]
    pub count_in_stock: u32,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub collections: String,
    #[serde(default)]
    pub material: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ProductImage>,
}

impl From<&Product> for ProductInput {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            discount_price: product.discount_price,
            count_in_stock: product.count_in_stock,
            sku: product.sku.clone(),
            category: product.category.clone(),
            brand: product.brand.clone(),
            sizes: product.sizes.clone(),
            colors: product.colors.clone(),
            collections: product.collections.clone(),
            material: product.material.clone(),
            gender: product.gender.clone(),
            images: product.images.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const PRODUCT_JSON: &str = r#"{
        "_id": "p1",
        "name": "Linen Shirt",
        "price": 39.99,
        "discountPrice": 29.99,
        "countInStock": 4,
        "sku": "LS-1",
        "category": "Top Wear",
        "sizes": ["S", "M"],
        "colors": ["White"],
        "images": [{"url": "https://img.example.com/1.jpg", "altText": "front"}]
    }"#;

    #[test]
    fn test_backend_product_parses_with_defaults() {
        let product: Product = serde_json::from_str(PRODUCT_JSON).unwrap();
        assert_eq!(product.id.as_str(), "p1");
        assert_eq!(product.price, Decimal::new(3999, 2));
        assert!(product.brand.is_empty());
        assert!(product.in_stock());
        assert_eq!(product.effective_price().display(), "$29.99");
        assert_eq!(
            product.primary_image().and_then(|i| i.alt_text.as_deref()),
            Some("front")
        );
    }

    #[test]
    fn test_input_serializes_prices_as_numbers() {
        let product: Product = serde_json::from_str(PRODUCT_JSON).unwrap();
        let json = serde_json::to_value(ProductInput::from(&product)).unwrap();
        assert_eq!(json["price"], serde_json::json!(39.99));
        assert_eq!(json["countInStock"], serde_json::json!(4));
    }

    #[test]
    fn test_cleared_discount_is_sent_as_null() {
        let product: Product = serde_json::from_str(PRODUCT_JSON).unwrap();
        let mut input = ProductInput::from(&product);
        assert_eq!(
            serde_json::to_value(&input).unwrap()["discountPrice"],
            serde_json::json!(29.99)
        );

        input.discount_price = None;
        let json = serde_json::to_value(&input).unwrap();
        assert!(json.as_object().unwrap().contains_key("discountPrice"));
        assert!(json["discountPrice"].is_null());
    }
}
