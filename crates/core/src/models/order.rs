use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CheckoutId, Email, OrderId, OrderStatus, Price, ProductId, UserId};

use super::CartLine;

/// Shipping address captured at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub country: String,
}

impl ShippingAddress {
    /// Single-line rendering for order summaries.
    #[must_use]
    pub fn one_line(&self) -> String {
        [&self.address, &self.city, &self.postal_code, &self.country]
            .into_iter()
            .filter(|part| !part.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Snapshot of a purchased line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
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

impl From<&CartLine> for OrderItem {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id.clone(),
            name: line.name.clone(),
            image: line.image.clone(),
            price: line.price,
            size: line.size.clone(),
            color: line.color.clone(),
            quantity: line.quantity,
        }
    }
}

impl OrderItem {
    #[must_use]
    pub fn line_total(&self) -> Price {
        Price::usd(self.price * Decimal::from(self.quantity))
    }
}

/// A checkout as created by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkout {
    #[serde(rename = "_id")]
    pub id: CheckoutId,
    #[serde(default, alias = "items", alias = "checkoutItem")]
    pub checkout_items: Vec<OrderItem>,
    #[serde(default)]
    pub shipping_address: ShippingAddress,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default)]
    pub is_finalized: bool,
}

impl Checkout {
    #[must_use]
    pub const fn total(&self) -> Price {
        Price::usd(self.total_price)
    }
}

/// The customer on an order: admin listings populate it, shopper listings
/// only carry the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserRef {
    Populated {
        #[serde(rename = "_id")]
        id: UserId,
        #[serde(default)]
        name: String,
        #[serde(default)]
        email: Option<Email>,
    },
    Id(UserId),
}

impl UserRef {
    #[must_use]
    pub const fn id(&self) -> &UserId {
        match self {
            Self::Populated { id, .. } | Self::Id(id) => id,
        }
    }

    /// Name when populated, otherwise the id.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Populated { name, .. } if !name.is_empty() => name.clone(),
            other => other.id().to_string(),
        }
    }
}

/// A finalized order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: OrderId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserRef>,
    #[serde(default, alias = "items", alias = "checkoutItems")]
    pub order_items: Vec<OrderItem>,
    #[serde(default)]
    pub shipping_address: ShippingAddress,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default, alias = "totalAmount", with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_delivered: bool,
    #[serde(default, alias = "orderStatus")]
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    #[must_use]
    pub const fn total(&self) -> Price {
        Price::usd(self.total_price)
    }

    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.order_items.iter().map(|item| item.quantity).sum()
    }

    /// Last characters of the id, as shown to shoppers.
    #[must_use]
    pub fn short_id(&self) -> &str {
        let id = self.id.as_str();
        id.char_indices()
            .rev()
            .nth(7)
            .map_or(id, |(start, _)| id.get(start..).unwrap_or(id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_accepts_alternate_field_names() {
        let order: Order = serde_json::from_str(
            r#"{
                "_id": "6650aa11bb22cc33dd44ee55",
                "user": {"_id": "u1", "name": "Ada", "email": "ada@example.com"},
                "items": [{"productId": "p1", "name": "Tee", "price": 12.5, "quantity": 2}],
                "totalAmount": 25,
                "orderStatus": "Shipped",
                "isPaid": true,
                "createdAt": "2024-05-24T10:00:00Z"
            }"#,
        )
        .unwrap();

        assert_eq!(order.status, OrderStatus::Shipped);
        assert_eq!(order.total().display(), "$25.00");
        assert_eq!(order.item_count(), 2);
        assert_eq!(order.user.as_ref().unwrap().label(), "Ada");
        assert_eq!(order.short_id(), "dd44ee55");
    }

    #[test]
    fn test_order_with_bare_user_id_and_no_status() {
        let order: Order =
            serde_json::from_str(r#"{"_id":"o1","user":"u9","orderItems":[],"totalPrice":0}"#)
                .unwrap();
        assert_eq!(order.status, OrderStatus::Processing);
        assert_eq!(order.user.as_ref().unwrap().label(), "u9");
        assert_eq!(order.short_id().len(), 2);
    }

    #[test]
    fn test_shipping_address_one_line_skips_blanks() {
        let address = ShippingAddress {
            address: "1 Main St".into(),
            city: "Springfield".into(),
            postal_code: String::new(),
            country: "USA".into(),
        };
        assert_eq!(address.one_line(), "1 Main St, Springfield, USA");
    }
}
