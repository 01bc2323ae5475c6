//! Core types for Bazaar.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod guest;
pub mod id;
pub mod price;
pub mod status;

pub use email::{Email, EmailError};
pub use guest::{CartOwner, GuestId};
pub use id::*;
pub use price::{CurrencyCode, Price};
pub use status::*;
