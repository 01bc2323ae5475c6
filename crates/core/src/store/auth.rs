use serde::{Deserialize, Serialize};

use crate::models::{AuthSession, User};
use crate::types::{CartOwner, GuestId};

use super::{Namespace, Slice};

/// Bearer token issued by the backend at login.
///
/// `Debug` is redacted so the token never reaches logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BearerToken(String);

impl BearerToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for the `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken([REDACTED])")
    }
}

/// Who is shopping: the logged-in user (with token) and the guest id that
/// owns the cart until login.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthData {
    pub user: Option<User>,
    pub token: Option<BearerToken>,
    pub guest_id: GuestId,
}

pub type AuthState = Slice<AuthData>;

impl Namespace for AuthState {
    const KEY: &'static str = "auth";
}

impl AuthState {
    /// Store the user and token from a successful login or registration.
    pub fn logged_in(&mut self, session: AuthSession) {
        self.data.user = Some(session.user);
        self.data.token = Some(BearerToken::new(session.token));
        self.settle();
    }

    /// Forget the user and start a fresh guest identity.
    pub fn logout(&mut self) {
        self.data.user = None;
        self.data.token = None;
        self.regenerate_guest_id();
        self.settle();
    }

    pub fn regenerate_guest_id(&mut self) {
        self.data.guest_id = GuestId::generate();
    }

    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        self.data.user.as_ref()
    }

    #[must_use]
    pub const fn token(&self) -> Option<&BearerToken> {
        self.data.token.as_ref()
    }

    #[must_use]
    pub const fn guest_id(&self) -> &GuestId {
        &self.data.guest_id
    }

    /// The logged-in user together with their token.
    #[must_use]
    pub fn credentials(&self) -> Option<(&User, &BearerToken)> {
        self.user().zip(self.token())
    }

    /// Owner of the cart this session is working on.
    #[must_use]
    pub fn cart_owner(&self) -> CartOwner {
        CartOwner::resolve(self.user().map(|user| &user.id), self.guest_id())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{Email, Role, UserId};

    fn session() -> AuthSession {
        AuthSession {
            user: User {
                id: UserId::new("u1"),
                name: "Ada".into(),
                email: Email::parse("ada@example.com").unwrap(),
                role: Role::Customer,
            },
            token: "tok-123".into(),
        }
    }

    #[test]
    fn test_login_switches_cart_owner_to_user() {
        let mut auth = AuthState::default();
        assert!(matches!(auth.cart_owner(), CartOwner::Guest(_)));

        auth.begin();
        auth.logged_in(session());
        assert!(!auth.loading);
        assert_eq!(auth.cart_owner(), CartOwner::User(UserId::new("u1")));
        assert_eq!(auth.token().unwrap().expose(), "tok-123");
    }

    #[test]
    fn test_logout_regenerates_guest_id() {
        let mut auth = AuthState::default();
        let before = auth.guest_id().clone();
        auth.logged_in(session());

        auth.logout();
        assert!(auth.user().is_none());
        assert!(auth.token().is_none());
        assert_ne!(auth.guest_id(), &before);
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = BearerToken::new("very-secret");
        assert!(!format!("{token:?}").contains("very-secret"));
    }
}
