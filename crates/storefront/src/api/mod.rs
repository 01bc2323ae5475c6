//! Client for the shop's REST backend.
//!
//! The backend is the source of truth for products, carts, checkouts, orders
//! and accounts. Every call is a single request; nothing is retried. Shopper
//! endpoints that need identity take the session's [`BearerToken`].
//!
//! # Example
//!
//! ```rust,ignore
//! use bazaar_storefront::api::ApiClient;
//!
//! let api = ApiClient::new("http://localhost:9000")?;
//! let product = api.get_product(&ProductId::new("64b7...")).await?;
//! ```

mod auth;
mod cart;
mod checkout;
mod orders;
mod products;

use std::sync::Arc;
use std::time::Duration;

use bazaar_core::store::BearerToken;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

pub use cart::CartItemInput;

/// Request timeout for backend calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Errors that can occur when calling the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("Backend returned {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Status {
        status: StatusCode,
        message: Option<String>,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured base URL cannot address the endpoint.
    #[error("Invalid backend URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// Text to show the shopper: the backend's own `message` when it sent
    /// one, otherwise `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Status {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(err) => err.status(),
            Self::Parse(_) | Self::Url(_) => None,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self.status(),
            Some(StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        )
    }
}

/// Error body the backend sends with failures.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Backend REST client.
///
/// Cheap to clone; the connection pool is shared.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: Client,
    base_url: Url,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

/// Parse the backend URL and give it a trailing slash so relative joins
/// append to its path instead of replacing the last segment.
fn directory_url(base_url: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(base_url)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

impl ApiClient {
    /// Create a client for the backend at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot be
    /// built.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url = directory_url(base_url)?;
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("bazaar-storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url,
            }),
        })
    }

    /// Resolve an API path below the base URL, keeping any path prefix the
    /// backend is mounted under.
    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Start a request to `path` (e.g. `/api/cart`), attaching the bearer
    /// token when given.
    fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&BearerToken>,
    ) -> Result<RequestBuilder, ApiError> {
        let builder = self.inner.client.request(method, self.endpoint(path)?);
        Ok(match token {
            Some(token) => builder.bearer_auth(token.expose()),
            None => builder,
        })
    }

    /// Send a request and decode the JSON response.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let body = self.send_raw(request).await?;

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse backend response"
            );
            ApiError::Parse(e)
        })
    }

    /// Send a request whose response body is not needed.
    async fn send_discarding(&self, request: RequestBuilder) -> Result<(), ApiError> {
        self.send_raw(request).await.map(drop)
    }

    async fn send_raw(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message);
            if status.is_server_error() {
                tracing::error!(
                    status = %status,
                    body = %body.chars().take(500).collect::<String>(),
                    "Backend returned server error"
                );
            } else {
                tracing::debug!(status = %status, message = ?message, "Backend rejected request");
            }
            return Err(ApiError::Status { status, message });
        }

        Ok(body)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_backend_text() {
        let err = ApiError::Status {
            status: StatusCode::BAD_REQUEST,
            message: Some("Product not found".to_string()),
        };
        assert_eq!(err.user_message("Failed to add to cart"), "Product not found");
    }

    #[test]
    fn test_user_message_falls_back() {
        let err = ApiError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: None,
        };
        assert_eq!(err.user_message("Failed to fetch cart"), "Failed to fetch cart");

        let blank = ApiError::Status {
            status: StatusCode::BAD_REQUEST,
            message: Some("  ".to_string()),
        };
        assert_eq!(blank.user_message("Login failed"), "Login failed");
    }

    #[test]
    fn test_status_helpers() {
        let not_found = ApiError::Status {
            status: StatusCode::NOT_FOUND,
            message: None,
        };
        assert!(not_found.is_not_found());
        assert!(!not_found.is_unauthorized());
    }

    #[test]
    fn test_new_rejects_invalid_base_url() {
        assert!(matches!(ApiClient::new("not a url"), Err(ApiError::Url(_))));
    }

    #[test]
    fn test_paths_resolve_below_base_prefix() {
        let client = ApiClient::new("https://shop.example.com/backend").unwrap();
        assert_eq!(
            client.endpoint("/api/cart").unwrap().as_str(),
            "https://shop.example.com/backend/api/cart"
        );

        let root = ApiClient::new("http://localhost:9000").unwrap();
        assert_eq!(
            root.endpoint("/api/products/p1").unwrap().as_str(),
            "http://localhost:9000/api/products/p1"
        );
    }
}
