//! Typed access to the per-visitor session.
//!
//! Each [`Namespace`] is stored as one JSON value under its own key, so a
//! handler only loads the slices it touches. The auth namespace is written
//! on first read so the generated guest id survives across requests.

use bazaar_core::models::User;
use bazaar_core::store::{
    AuthState, BearerToken, CartState, CheckoutState, Namespace, OrdersState,
};
use bazaar_core::toast::Toast;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tower_sessions::session::Error as SessionError;

/// The logged-in shopper, as handed to handlers by the auth extractors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub user: User,
    pub token: BearerToken,
}

impl CurrentUser {
    /// Build from the auth namespace, if someone is logged in.
    #[must_use]
    pub fn from_auth(auth: &AuthState) -> Option<Self> {
        auth.credentials().map(|(user, token)| Self {
            user: user.clone(),
            token: token.clone(),
        })
    }
}

/// Wrapper over [`Session`] with namespace-aware load/save.
#[derive(Debug, Clone)]
pub struct ShopperSession {
    session: Session,
}

impl ShopperSession {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    /// The underlying session.
    #[must_use]
    pub const fn inner(&self) -> &Session {
        &self.session
    }

    /// Load a namespace, falling back to its initial state.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails or the stored value no
    /// longer deserializes.
    pub async fn load<N: Namespace>(&self) -> Result<N, SessionError> {
        Ok(self.session.get::<N>(N::KEY).await?.unwrap_or_default())
    }

    /// Persist a namespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn save<N: Namespace>(&self, value: &N) -> Result<(), SessionError> {
        self.session.insert(N::KEY, value).await
    }

    /// Load the auth namespace, persisting a fresh guest id the first time.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn auth(&self) -> Result<AuthState, SessionError> {
        if let Some(auth) = self.session.get::<AuthState>(AuthState::KEY).await? {
            return Ok(auth);
        }
        let auth = AuthState::default();
        self.save(&auth).await?;
        tracing::debug!(guest_id = %auth.guest_id(), "Issued guest id");
        Ok(auth)
    }

    /// The logged-in shopper, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn current_user(&self) -> Result<Option<CurrentUser>, SessionError> {
        let auth = self.session.get::<AuthState>(AuthState::KEY).await?;
        Ok(auth.as_ref().and_then(CurrentUser::from_auth))
    }

    /// Log out: new guest identity, and the cart, checkout and order caches
    /// are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn reset_shopper(&self) -> Result<(), SessionError> {
        let mut auth = self.auth().await?;
        auth.logout();
        self.save(&auth).await?;
        self.save(&CartState::default()).await?;
        self.save(&CheckoutState::default()).await?;
        self.save(&OrdersState::default()).await?;
        self.session.cycle_id().await
    }

    /// Queue a toast to show on the next full page render.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn flash(&self, toast: Toast) -> Result<(), SessionError> {
        self.session.insert(Toast::SESSION_KEY, toast).await
    }

    /// Take the pending toast, if any. It will not be shown again.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn take_flash(&self) -> Result<Option<Toast>, SessionError> {
        self.session.remove::<Toast>(Toast::SESSION_KEY).await
    }
}

impl<S> axum::extract::FromRequestParts<S> for ShopperSession
where
    S: Send + Sync,
{
    type Rejection = <Session as axum::extract::FromRequestParts<S>>::Rejection;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        Session::from_request_parts(parts, state).await.map(Self::new)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use bazaar_core::models::{AuthSession, Cart};
    use bazaar_core::{Email, Role, UserId};
    use tower_sessions::MemoryStore;

    use super::*;

    fn session() -> ShopperSession {
        ShopperSession::new(Session::new(None, Arc::new(MemoryStore::default()), None))
    }

    fn login() -> AuthSession {
        AuthSession {
            user: User {
                id: UserId::new("u1"),
                name: "Ada".into(),
                email: Email::parse("ada@example.com").unwrap(),
                role: Role::Customer,
            },
            token: "tok".into(),
        }
    }

    #[tokio::test]
    async fn test_guest_id_is_stable_across_loads() {
        let session = session();
        let first = session.auth().await.unwrap();
        let second = session.auth().await.unwrap();
        assert_eq!(first.guest_id(), second.guest_id());
    }

    #[tokio::test]
    async fn test_reset_shopper_forgets_user_and_cart() {
        let session = session();
        let mut auth = session.auth().await.unwrap();
        let guest = auth.guest_id().clone();
        auth.logged_in(login());
        session.save(&auth).await.unwrap();

        let mut cart = CartState::default();
        cart.received(Cart {
            total_price: rust_decimal::Decimal::ONE,
            ..Cart::default()
        });
        session.save(&cart).await.unwrap();

        assert!(session.current_user().await.unwrap().is_some());
        session.reset_shopper().await.unwrap();

        let auth = session.auth().await.unwrap();
        assert!(auth.user().is_none());
        assert_ne!(auth.guest_id(), &guest);
        assert_eq!(session.load::<CartState>().await.unwrap(), CartState::default());
    }

    #[tokio::test]
    async fn test_flash_is_shown_once() {
        let session = session();
        session.flash(Toast::success("Saved")).await.unwrap();
        assert_eq!(
            session.take_flash().await.unwrap(),
            Some(Toast::success("Saved"))
        );
        assert_eq!(session.take_flash().await.unwrap(), None);
    }
}
