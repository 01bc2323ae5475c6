//! Session-related types for admin authentication.
//!
//! The admin session holds the logged-in admin (with the backend token used
//! for every `/api/admin` call), the three admin collection namespaces and a
//! one-shot flash toast.

use bazaar_core::models::{AuthSession, User};
use bazaar_core::store::{BearerToken, Namespace};
use bazaar_core::toast::Toast;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tower_sessions::session::Error as SessionError;

/// Session-stored admin identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentAdmin {
    pub user: User,
    pub token: BearerToken,
}

impl From<AuthSession> for CurrentAdmin {
    fn from(session: AuthSession) -> Self {
        Self {
            user: session.user,
            token: BearerToken::new(session.token),
        }
    }
}

/// Session keys for admin authentication data.
pub mod session_keys {
    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";
}

/// Namespace-aware wrapper over the admin's [`Session`].
#[derive(Debug, Clone)]
pub struct AdminSession {
    session: Session,
}

impl AdminSession {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    /// Load a namespace, falling back to its initial state.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn load<N: Namespace>(&self) -> Result<N, SessionError> {
        Ok(self.session.get::<N>(N::KEY).await?.unwrap_or_default())
    }

    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn save<N: Namespace>(&self, value: &N) -> Result<(), SessionError> {
        self.session.insert(N::KEY, value).await
    }

    /// Store a toast to show on the next full page.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn flash(&self, toast: Toast) -> Result<(), SessionError> {
        self.session.insert(Toast::SESSION_KEY, toast).await
    }

    /// Take the pending flash toast, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn take_flash(&self) -> Result<Option<Toast>, SessionError> {
        self.session.remove::<Toast>(Toast::SESSION_KEY).await
    }
}

impl<S> axum::extract::FromRequestParts<S> for AdminSession
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

    use bazaar_core::store::AdminProductsState;
    use tower_sessions::MemoryStore;

    use super::*;

    fn session() -> AdminSession {
        AdminSession::new(Session::new(None, Arc::new(MemoryStore::default()), None))
    }

    #[tokio::test]
    async fn test_namespace_defaults_then_persists() {
        let session = session();
        let mut products: AdminProductsState = session.load().await.unwrap();
        assert!(products.data.products.is_empty());

        products.reject("Failed to fetch products");
        session.save(&products).await.unwrap();

        let reloaded: AdminProductsState = session.load().await.unwrap();
        assert_eq!(reloaded.error.as_deref(), Some("Failed to fetch products"));
    }

    #[tokio::test]
    async fn test_flash_is_taken_once() {
        let session = session();
        session.flash(Toast::success("Product updated successfully")).await.unwrap();

        assert!(session.take_flash().await.unwrap().is_some());
        assert!(session.take_flash().await.unwrap().is_none());
    }
}
