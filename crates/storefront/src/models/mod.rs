//! Session-backed shopper state.

pub mod session;

pub use session::{CurrentUser, ShopperSession};
