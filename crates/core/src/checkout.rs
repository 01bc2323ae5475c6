//! Checkout form validation and the request it produces.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::messages;
use crate::models::{Cart, OrderItem, ShippingAddress};
use crate::types::{Email, PaymentStatus, Price};

/// Payment method recorded on every checkout.
pub const PAYMENT_METHOD: &str = "PayPal";

/// Shipping details entered on the checkout page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub phone: String,
}

/// Why a checkout submission was blocked.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckoutValidationError {
    #[error("{}", messages::CART_EMPTY)]
    EmptyCart,
    #[error("{}", messages::MISSING_REQUIRED_FIELDS)]
    MissingRequiredFields,
    #[error("Please enter a valid email address")]
    InvalidEmail,
}

impl CheckoutForm {
    /// Pre-fill from the logged-in user's profile.
    #[must_use]
    pub fn for_email(email: &Email) -> Self {
        Self {
            email: email.to_string(),
            ..Self::default()
        }
    }

    /// Check that the cart has items and email, first name and address are
    /// filled in.
    ///
    /// # Errors
    ///
    /// Returns the first problem found, in the order: empty cart, missing
    /// required field, malformed email.
    pub fn validate(&self, cart: &Cart) -> Result<(), CheckoutValidationError> {
        if cart.is_empty() {
            return Err(CheckoutValidationError::EmptyCart);
        }
        let required = [&self.email, &self.first_name, &self.address];
        if required.iter().any(|value| value.trim().is_empty()) {
            return Err(CheckoutValidationError::MissingRequiredFields);
        }
        Email::parse(&self.email).map_err(|_| CheckoutValidationError::InvalidEmail)?;
        Ok(())
    }

    #[must_use]
    pub fn shipping_address(&self) -> ShippingAddress {
        ShippingAddress {
            address: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            postal_code: self.postal_code.trim().to_string(),
            country: self.country.trim().to_string(),
        }
    }
}

/// Body of `POST /api/checkout`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[serde(rename = "checkoutItem")]
    pub checkout_items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
}

impl CheckoutRequest {
    /// Snapshot the cart lines and subtotal.
    #[must_use]
    pub fn from_cart(cart: &Cart, form: &CheckoutForm) -> Self {
        Self {
            checkout_items: cart.products.iter().map(OrderItem::from).collect(),
            shipping_address: form.shipping_address(),
            payment_method: PAYMENT_METHOD.to_string(),
            total_price: cart.subtotal().amount,
        }
    }

    #[must_use]
    pub const fn total(&self) -> Price {
        Price::usd(self.total_price)
    }
}

/// Body of `PUT /api/checkout/{id}/pay`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfirmation {
    pub payment_status: PaymentStatus,
    /// Provider transaction details, relayed verbatim.
    pub payment_details: serde_json::Value,
}

impl PaymentConfirmation {
    #[must_use]
    pub const fn paid(payment_details: serde_json::Value) -> Self {
        Self {
            payment_status: PaymentStatus::Paid,
            payment_details,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::CartLine;
    use crate::types::ProductId;

    fn cart() -> Cart {
        Cart {
            products: vec![CartLine {
                product_id: ProductId::new("p1"),
                name: "Tee".into(),
                image: String::new(),
                price: Decimal::new(1250, 2),
                size: "M".into(),
                color: "Red".into(),
                quantity: 2,
            }],
            ..Cart::default()
        }
    }

    fn form() -> CheckoutForm {
        CheckoutForm {
            email: "ada@example.com".into(),
            first_name: "Ada".into(),
            address: "1 Main St".into(),
            city: "Springfield".into(),
            ..CheckoutForm::default()
        }
    }

    #[test]
    fn test_missing_required_field_blocks_submission() {
        for blank in ["email", "first_name", "address"] {
            let mut form = form();
            match blank {
                "email" => form.email = "  ".into(),
                "first_name" => form.first_name.clear(),
                _ => form.address.clear(),
            }
            let err = form.validate(&cart()).unwrap_err();
            assert_eq!(err, CheckoutValidationError::MissingRequiredFields);
            assert_eq!(err.to_string(), "Please fill all required fields");
        }
    }

    #[test]
    fn test_empty_cart_blocks_submission() {
        let err = form().validate(&Cart::default()).unwrap_err();
        assert_eq!(err.to_string(), "Your cart is empty!");
    }

    #[test]
    fn test_optional_fields_may_be_blank() {
        assert!(form().validate(&cart()).is_ok());
    }

    #[test]
    fn test_request_snapshots_cart() {
        let request = CheckoutRequest::from_cart(&cart(), &form());
        assert_eq!(request.total().display(), "$25.00");
        assert_eq!(request.payment_method, "PayPal");

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["checkoutItem"][0]["quantity"], 2);
        assert!(json.get("checkoutItems").is_none());
        assert_eq!(json["shippingAddress"]["city"], "Springfield");
        assert_eq!(json["totalPrice"], serde_json::json!(25.0));
    }

    #[test]
    fn test_payment_confirmation_shape() {
        let body = PaymentConfirmation::paid(serde_json::json!({"id": "PAY-1"}));
        let json = serde_json::to_value(body).unwrap();
        assert_eq!(json["paymentStatus"], "Paid");
        assert_eq!(json["paymentDetails"]["id"], "PAY-1");
    }
}
