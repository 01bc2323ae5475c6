//! Unified error handling with Sentry integration.
//!
//! Handlers return `Result<T, AppError>`. Server-side failures are captured
//! to Sentry before the response is built; shoppers only see a generic
//! message for those.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::api::ApiError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend call failed.
    #[error("Backend error: {0}")]
    Api(#[from] ApiError),

    /// Session store failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Template rendering failed.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// A backend 404 becomes a storefront 404; everything else passes through.
    #[must_use]
    pub fn not_found_or(err: ApiError, what: impl Into<String>) -> Self {
        if err.is_not_found() {
            Self::NotFound(what.into())
        } else {
            Self::Api(err)
        }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Api(err) if err.is_unauthorized() => StatusCode::UNAUTHORIZED,
            Self::Api(err) if err.is_not_found() => StatusCode::NOT_FOUND,
            Self::Api(_) => StatusCode::BAD_GATEWAY,
            Self::Session(_) | Self::Template(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let message = match &self {
            Self::Api(_) if status == StatusCode::BAD_GATEWAY => {
                "The shop is having trouble right now. Please try again.".to_string()
            }
            Self::Api(_) if status == StatusCode::UNAUTHORIZED => {
                "Please log in again".to_string()
            }
            Self::Api(_) => "Not found".to_string(),
            Self::Session(_) | Self::Template(_) | Self::Internal(_) => {
                "Internal server error".to_string()
            }
            Self::NotFound(_) => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Associate subsequent Sentry events with a user.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Record a shopper action; Sentry reports show the trail leading up to an
/// error.
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "64b7")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    for (key, value) in data.unwrap_or_default() {
        breadcrumb.data.insert(
            (*key).to_string(),
            serde_json::Value::String((*value).to_string()),
        );
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(status: StatusCode) -> ApiError {
        ApiError::Status {
            status,
            message: Some("boom".into()),
        }
    }

    #[test]
    fn test_backend_failures_map_to_gateway_errors() {
        assert_eq!(
            AppError::from(backend(StatusCode::INTERNAL_SERVER_ERROR)).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::from(backend(StatusCode::UNAUTHORIZED)).status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_not_found_or_converts_backend_404() {
        let err = AppError::not_found_or(backend(StatusCode::NOT_FOUND), "product p1");
        assert!(matches!(err, AppError::NotFound(ref what) if what == "product p1"));

        let err = AppError::not_found_or(backend(StatusCode::BAD_REQUEST), "product p1");
        assert!(matches!(err, AppError::Api(_)));
    }

    #[test]
    fn test_local_error_status_codes() {
        assert_eq!(
            AppError::NotFound("x".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Internal("x".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
