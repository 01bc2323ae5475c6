//! Records mirrored from the backend REST API.
//!
//! Field names follow the backend's JSON (camelCase, ids under `_id`). Money
//! fields travel as JSON numbers, so they use `rust_decimal::serde::float`.
//! Optional fields default when the backend omits them; nothing here
//! enforces invariants beyond that.

mod cart;
mod order;
mod product;
mod user;

pub use cart::{Cart, CartLine};
pub use order::{Checkout, Order, OrderItem, ShippingAddress, UserRef};
pub use product::{Product, ProductImage, ProductInput};
pub use user::{AuthSession, User};
