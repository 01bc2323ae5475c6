//! Authentication extractors.
//!
//! The logged-in user lives in the session's auth namespace. Pages that need
//! an account use [`RequireAuth`].

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentUser, ShopperSession};

/// Extractor that requires a logged-in shopper.
///
/// Anonymous page requests are redirected to the login page, which sends the
/// shopper back here afterwards.
///
/// # Example
///
/// ```rust,ignore
/// async fn account(RequireAuth(current): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", current.user.name)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Rejection when a login is required.
#[derive(Debug)]
pub enum AuthRejection {
    /// Redirect to login page (for HTML requests), keeping the target.
    RedirectToLogin(String),
    /// Unauthorized response (for API and fragment requests).
    Unauthorized,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin(target) => Redirect::to(&login_url(&target)).into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

/// Login URL that returns to `target` afterwards.
#[must_use]
pub fn login_url(target: &str) -> String {
    if target.is_empty() || target == "/" {
        "/auth/login".to_string()
    } else {
        format!("/auth/login?redirect={}", urlencoding::encode(target))
    }
}

/// Only same-site relative paths are followed after login.
#[must_use]
pub fn safe_redirect(target: Option<&str>) -> &str {
    match target {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path
        }
        _ => "/",
    }
}

async fn current_user(parts: &Parts) -> Option<CurrentUser> {
    let session = parts.extensions.get::<Session>()?.clone();
    ShopperSession::new(session)
        .current_user()
        .await
        .ok()
        .flatten()
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = current_user(parts).await {
            return Ok(Self(user));
        }

        let is_fragment = parts.uri.path().starts_with("/api/")
            || parts.headers.contains_key("hx-request")
            || parts.method != axum::http::Method::GET;
        if is_fragment {
            Err(AuthRejection::Unauthorized)
        } else {
            // Nested routers see a stripped URI; the original has the full path
            let uri = parts
                .extensions
                .get::<axum::extract::OriginalUri>()
                .map_or(&parts.uri, |original| &original.0);
            let target = uri
                .path_and_query()
                .map_or_else(|| uri.path().to_string(), ToString::to_string);
            Err(AuthRejection::RedirectToLogin(target))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_url_keeps_target() {
        assert_eq!(login_url("/checkout"), "/auth/login?redirect=%2Fcheckout");
        assert_eq!(login_url("/"), "/auth/login");
    }

    #[test]
    fn test_safe_redirect_rejects_offsite_targets() {
        assert_eq!(safe_redirect(Some("/account")), "/account");
        assert_eq!(safe_redirect(Some("//evil.example")), "/");
        assert_eq!(safe_redirect(Some("https://evil.example")), "/");
        assert_eq!(safe_redirect(None), "/");
    }
}
