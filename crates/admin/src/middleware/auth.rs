//! Authentication extractor for admin routes.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentAdmin, session_keys};

/// Extractor that requires a logged-in admin.
///
/// Page requests without one are redirected to the login page. HTMX requests
/// get a 401 with `HX-Redirect` so the whole page navigates instead of
/// swapping the login form into a table cell.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdminAuth(admin): RequireAdminAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", admin.user.name)
/// }
/// ```
pub struct RequireAdminAuth(pub CurrentAdmin);

/// Why [`RequireAdminAuth`] refused the request.
#[derive(Debug, PartialEq, Eq)]
pub enum AdminAuthRejection {
    RedirectToLogin,
    Unauthorized,
    /// Logged in, but the account is not an admin.
    Forbidden,
}

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/auth/login").into_response(),
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                [("HX-Redirect", "/auth/login")],
            )
                .into_response(),
            Self::Forbidden => (StatusCode::FORBIDDEN, "Admin access required").into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAdminAuth
where
    S: Send + Sync,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AdminAuthRejection::Unauthorized)?;

        let admin: CurrentAdmin = session
            .get(session_keys::CURRENT_ADMIN)
            .await
            .ok()
            .flatten()
            .ok_or_else(|| {
                if parts.headers.contains_key("hx-request") {
                    AdminAuthRejection::Unauthorized
                } else {
                    AdminAuthRejection::RedirectToLogin
                }
            })?;

        if !admin.user.role.is_admin() {
            return Err(AdminAuthRejection::Forbidden);
        }

        Ok(Self(admin))
    }
}

/// Store the logged-in admin in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_admin(
    session: &Session,
    admin: &CurrentAdmin,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_ADMIN, admin).await
}

/// Forget the admin and every cached collection (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_admin(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::http::Request;
    use bazaar_core::Role;
    use bazaar_core::models::User;
    use bazaar_core::store::BearerToken;
    use tower_sessions::MemoryStore;

    use super::*;

    fn admin(role: Role) -> CurrentAdmin {
        let mut user: User = serde_json::from_value(serde_json::json!({
            "_id": "a1", "name": "Root", "email": "root@example.com"
        }))
        .unwrap();
        user.role = role;
        CurrentAdmin {
            user,
            token: BearerToken::new("t"),
        }
    }

    async fn extract(
        stored: Option<CurrentAdmin>,
        htmx: bool,
    ) -> Result<RequireAdminAuth, AdminAuthRejection> {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        if let Some(admin) = stored {
            set_current_admin(&session, &admin).await.unwrap();
        }

        let mut builder = Request::builder().uri("/users");
        if htmx {
            builder = builder.header("hx-request", "true");
        }
        let (mut parts, ()) = builder.body(()).unwrap().into_parts();
        parts.extensions.insert(session);
        RequireAdminAuth::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_missing_admin_redirects_pages() {
        let rejection = extract(None, false).await.err().unwrap();
        assert_eq!(rejection, AdminAuthRejection::RedirectToLogin);
    }

    #[tokio::test]
    async fn test_missing_admin_on_htmx_is_unauthorized() {
        let rejection = extract(None, true).await.err().unwrap();
        assert_eq!(rejection, AdminAuthRejection::Unauthorized);
        let response = rejection.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers().get("HX-Redirect").unwrap(), "/auth/login");
    }

    #[tokio::test]
    async fn test_customer_role_is_forbidden() {
        let rejection = extract(Some(admin(Role::Customer)), false).await.err().unwrap();
        assert_eq!(rejection, AdminAuthRejection::Forbidden);
    }

    #[tokio::test]
    async fn test_admin_is_accepted() {
        let RequireAdminAuth(current) = extract(Some(admin(Role::Admin)), false).await.unwrap();
        assert_eq!(current.user.name, "Root");
    }
}
