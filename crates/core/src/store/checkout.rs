use crate::models::Checkout;

use super::{Namespace, Slice};

/// The checkout in progress, if any.
pub type CheckoutState = Slice<Option<Checkout>>;

impl Namespace for CheckoutState {
    const KEY: &'static str = "checkout";
}

impl CheckoutState {
    pub fn created(&mut self, checkout: Checkout) {
        self.resolve(Some(checkout));
    }

    /// Drop the checkout once it has been finalized into an order.
    pub fn clear(&mut self) {
        self.resolve(None);
    }

    #[must_use]
    pub const fn current(&self) -> Option<&Checkout> {
        self.data.as_ref()
    }
}
