//! Admin client for the shop's REST backend.
//!
//! Every admin endpoint requires the bearer token of a user whose role is
//! `admin`; the backend enforces that and answers 401/403 otherwise.

mod auth;
mod orders;
mod products;
mod upload;
mod users;

use std::sync::Arc;
use std::time::Duration;

use bazaar_core::store::BearerToken;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

pub use upload::ImageUpload;
pub use users::{NewUser, UserUpdate};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur when calling the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend returned {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Status {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid backend URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// The backend's `message` when it sent one, otherwise `fallback`.
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

    /// The token expired or belongs to a non-admin.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self.status(),
            Some(StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        )
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Backend REST client for the admin console.
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
            .user_agent(concat!("bazaar-admin/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner { client, base_url }),
        })
    }

    /// Resolve an API path below the base URL, keeping any path prefix the
    /// backend is mounted under.
    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path.trim_start_matches('/'))?)
    }

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

    async fn send_discarding(&self, request: RequestBuilder) -> Result<(), ApiError> {
        self.send_raw(request).await.map(drop)
    }

    async fn send_raw(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await?;
        let status = response.status();
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

/// Path segment for an entity id.
fn segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_forbidden_counts_as_unauthorized() {
        let err = ApiError::Status {
            status: StatusCode::FORBIDDEN,
            message: Some("Not authorized as an admin".to_string()),
        };
        assert!(err.is_unauthorized());
        assert_eq!(err.user_message("Failed to fetch users"), "Not authorized as an admin");
    }

    #[test]
    fn test_segment_escapes_slashes() {
        assert_eq!(segment("a/b"), "a%2Fb");
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
