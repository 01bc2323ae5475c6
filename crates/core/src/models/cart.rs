use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CartId, Price, ProductId, UserId};

/// One line of a cart: a product in a given size and color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub color: String,
    pub quantity: u32,
}

impl CartLine {
    /// Whether this line holds the given product variant.
    #[must_use]
    pub fn matches(&self, product_id: &ProductId, size: &str, color: &str) -> bool {
        &self.product_id == product_id && self.size == size && self.color == color
    }

    /// Price × quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// A cart as last confirmed by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CartId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_id: Option<String>,
    #[serde(default)]
    pub products: Vec<CartLine>,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
}

impl Cart {
    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.products.iter().map(|line| line.quantity).sum()
    }

    /// Sum of price × quantity across all lines.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        Price::usd(self.products.iter().map(CartLine::line_total).sum())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Find the line for a product variant.
    #[must_use]
    pub fn line(&self, product_id: &ProductId, size: &str, color: &str) -> Option<&CartLine> {
        self.products
            .iter()
            .find(|line| line.matches(product_id, size, color))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(id: &str, size: &str, quantity: u32, cents: i64) -> CartLine {
        CartLine {
            product_id: ProductId::new(id),
            name: format!("Product {id}"),
            image: String::new(),
            price: Decimal::new(cents, 2),
            size: size.to_string(),
            color: "Black".to_string(),
            quantity,
        }
    }

    #[test]
    fn test_item_count_and_subtotal() {
        let cart = Cart {
            products: vec![line("a", "M", 2, 1500), line("b", "L", 1, 999)],
            ..Cart::default()
        };
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.subtotal().display(), "$39.99");
    }

    #[test]
    fn test_line_lookup_distinguishes_variants() {
        let cart = Cart {
            products: vec![line("a", "M", 1, 100), line("a", "L", 4, 100)],
            ..Cart::default()
        };
        let found = cart.line(&ProductId::new("a"), "L", "Black").unwrap();
        assert_eq!(found.quantity, 4);
        assert!(cart.line(&ProductId::new("a"), "S", "Black").is_none());
    }

    #[test]
    fn test_backend_cart_parses() {
        let cart: Cart = serde_json::from_str(
            r#"{"_id":"c1","guestId":"guest_1","products":[
                {"productId":"p1","name":"Tee","image":"x.jpg","price":10,"size":"M","color":"Red","quantity":2}
            ],"totalPrice":20}"#,
        )
        .unwrap();
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.total_price, Decimal::from(20));
    }
}
