//! Guest identifiers for carts owned by shoppers who have not logged in.

use serde::{Deserialize, Serialize};

use super::UserId;

/// Identifier for an unauthenticated shopper's cart.
///
/// Formatted as `guest_<unix-millis>_<suffix>`. The millisecond prefix keeps
/// ids sortable by creation time; the random suffix keeps two shoppers who
/// arrive in the same millisecond apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuestId(String);

impl GuestId {
    /// Prefix every generated guest id starts with.
    pub const PREFIX: &'static str = "guest_";

    /// Generate a fresh guest id.
    #[must_use]
    pub fn generate() -> Self {
        let millis = chrono::Utc::now().timestamp_millis();
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        Self(format!(
            "{}{millis}_{}",
            Self::PREFIX,
            suffix.get(..8).unwrap_or(&suffix)
        ))
    }

    /// Wrap an existing guest id (e.g. one carried over from a session).
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the underlying string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for GuestId {
    fn default() -> Self {
        Self::generate()
    }
}

impl std::fmt::Display for GuestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who a cart belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartOwner {
    /// An authenticated user's cart.
    User(UserId),
    /// A guest cart.
    Guest(GuestId),
}

impl CartOwner {
    /// Resolve the owner from the optional logged-in user, falling back to
    /// the guest id.
    #[must_use]
    pub fn resolve(user_id: Option<&UserId>, guest_id: &GuestId) -> Self {
        user_id.map_or_else(
            || Self::Guest(guest_id.clone()),
            |id| Self::User(id.clone()),
        )
    }

    /// `userId` query/body value, if owned by a user.
    #[must_use]
    pub fn user_id(&self) -> Option<&UserId> {
        match self {
            Self::User(id) => Some(id),
            Self::Guest(_) => None,
        }
    }

    /// `guestId` query/body value, if owned by a guest.
    #[must_use]
    pub fn guest_id(&self) -> Option<&GuestId> {
        match self {
            Self::Guest(id) => Some(id),
            Self::User(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_have_prefix_and_differ() {
        let a = GuestId::generate();
        let b = GuestId::generate();
        assert!(a.as_str().starts_with(GuestId::PREFIX));
        assert_ne!(a, b);
    }

    #[test]
    fn test_owner_prefers_user() {
        let guest = GuestId::new("guest_1_abc");
        let user = UserId::new("u1");

        assert_eq!(
            CartOwner::resolve(Some(&user), &guest),
            CartOwner::User(user.clone())
        );
        assert_eq!(
            CartOwner::resolve(None, &guest).guest_id(),
            Some(&guest)
        );
    }
}
