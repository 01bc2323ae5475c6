//! Bazaar Core - Shared types library.
//!
//! This crate provides common types used across all Bazaar components:
//! - `storefront` - Public-facing shop
//! - `admin` - Admin console for users, products and orders
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types, reducers and pure functions - no
//! database access, no HTTP clients. The one exception is [`env`], which
//! reads configuration variables. Both binaries talk to the same
//! backend REST API and keep what it returns in per-session namespaces
//! defined in [`store`].
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, statuses
//! - [`models`] - Records mirrored from the backend
//! - [`store`] - Namespaced `{data, loading, error}` state and reducers
//! - [`catalog`] - Product queries and sidebar filtering
//! - [`checkout`] - Checkout form validation and request bodies
//! - [`env`] - Environment lookups and session secret checks
//! - [`toast`] - Transient notifications
//! - [`messages`] - User-facing message strings

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod checkout;
pub mod env;
pub mod messages;
pub mod models;
pub mod store;
pub mod toast;
pub mod types;

pub use types::*;
