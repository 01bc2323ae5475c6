use crate::models::Cart;

use super::{Namespace, Slice};

/// Last cart state the backend confirmed.
pub type CartState = Slice<Cart>;

impl Namespace for CartState {
    const KEY: &'static str = "cart";
}

impl CartState {
    /// Adopt the cart returned by a fetch, add, update, remove or merge.
    pub fn received(&mut self, cart: Cart) {
        self.resolve(cart);
    }

    /// Empty the cached cart (after an order is finalized or on logout).
    pub fn clear(&mut self) {
        self.resolve(Cart::default());
    }

    /// Number of units in the cached cart, for the header badge.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.data.item_count()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::models::CartLine;
    use crate::types::ProductId;

    fn line(quantity: u32) -> CartLine {
        CartLine {
            product_id: ProductId::new("p1"),
            name: "Tee".into(),
            image: String::new(),
            price: Decimal::from(10),
            size: "M".into(),
            color: "Red".into(),
            quantity,
        }
    }

    #[test]
    fn test_adding_item_increments_count_by_quantity() {
        let mut state = CartState::default();
        state.received(Cart {
            products: vec![line(1)],
            ..Cart::default()
        });
        let before = state.item_count();

        // The backend answers an add of 3 units with the merged line.
        state.received(Cart {
            products: vec![line(4)],
            ..Cart::default()
        });
        assert_eq!(state.item_count(), before + 3);
    }

    #[test]
    fn test_removing_last_unit_drops_line() {
        let mut state = CartState::default();
        state.received(Cart {
            products: vec![line(1)],
            ..Cart::default()
        });

        state.received(Cart::default());
        assert!(state.data.is_empty());
        assert_eq!(state.item_count(), 0);
    }

    #[test]
    fn test_failed_mutation_keeps_cached_cart() {
        let mut state = CartState::default();
        state.received(Cart {
            products: vec![line(2)],
            ..Cart::default()
        });

        state.begin();
        state.reject("Failed to add to cart");
        assert_eq!(state.item_count(), 2);
        assert_eq!(state.error.as_deref(), Some("Failed to add to cart"));
    }
}
