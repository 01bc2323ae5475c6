//! Session-stored admin types.

pub mod session;

pub use session::{AdminSession, CurrentAdmin, session_keys};
