//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string (session store)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//! - `STOREFRONT_SESSION_SECRET` - Session secret (min 32 chars, high entropy)
//! - `BACKEND_URL` - Base URL of the shop's REST API
//! - `PAYPAL_CLIENT_ID` - Public client ID for the PayPal JS SDK
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `PAYPAL_CURRENCY` - Currency passed to the PayPal SDK (default: USD)
//! - `BAZAAR_LOG_JSON` - Emit JSON logs when set
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.1)

use std::net::{IpAddr, SocketAddr};

use bazaar_core::CurrencyCode;
use bazaar_core::env;
use secrecy::SecretString;

pub use bazaar_core::env::ConfigError;

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Session secret
    pub session_secret: SecretString,
    /// Backend REST API base URL
    pub backend_url: String,
    /// PayPal widget configuration
    pub paypal: PayPalConfig,
    /// Emit JSON-formatted logs
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// PayPal JS SDK configuration. The client ID is meant to be public.
#[derive(Debug, Clone)]
pub struct PayPalConfig {
    pub client_id: String,
    pub currency: CurrencyCode,
}

impl PayPalConfig {
    /// SDK script URL for the checkout page.
    #[must_use]
    pub fn sdk_url(&self) -> String {
        format!(
            "https://www.paypal.com/sdk/js?client-id={}&currency={}",
            urlencoding::encode(&self.client_id),
            self.currency.code()
        )
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is fine; the variables may come from the host.
        let _ = dotenvy::dotenv();

        let backend_url = env::required("BACKEND_URL")?;
        url::Url::parse(&backend_url)
            .map_err(|e| ConfigError::InvalidEnvVar("BACKEND_URL".to_string(), e.to_string()))?;

        Ok(Self {
            database_url: SecretString::from(env::first_of(&[
                "STOREFRONT_DATABASE_URL",
                "DATABASE_URL",
            ])?),
            host: env::parse_or("STOREFRONT_HOST", "127.0.0.1")?,
            port: env::parse_or("STOREFRONT_PORT", "3000")?,
            base_url: env::required("STOREFRONT_BASE_URL")?,
            session_secret: SecretString::from(env::session_secret("STOREFRONT_SESSION_SECRET")?),
            backend_url,
            paypal: PayPalConfig {
                client_id: env::required("PAYPAL_CLIENT_ID")?,
                currency: env::parse_or("PAYPAL_CURRENCY", "USD")?,
            },
            log_json: env::optional("BAZAAR_LOG_JSON").is_some(),
            sentry_dsn: env::optional("SENTRY_DSN"),
            sentry_environment: env::optional("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: env::parse_or("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: env::parse_or("SENTRY_TRACES_SAMPLE_RATE", "0.1")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` flag.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> StorefrontConfig {
        StorefrontConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            session_secret: SecretString::from("x".repeat(32)),
            backend_url: "http://localhost:9000".to_string(),
            paypal: PayPalConfig {
                client_id: "sb client".to_string(),
                currency: CurrencyCode::USD,
            },
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.1,
        }
    }

    #[test]
    fn test_socket_addr() {
        let addr = test_config().socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_is_secure_follows_base_url() {
        let mut config = test_config();
        assert!(!config.is_secure());
        config.base_url = "https://shop.example.com".to_string();
        assert!(config.is_secure());
    }

    #[test]
    fn test_paypal_sdk_url_encodes_client_id() {
        let url = test_config().paypal.sdk_url();
        assert_eq!(
            url,
            "https://www.paypal.com/sdk/js?client-id=sb%20client&currency=USD"
        );
    }

    #[test]
    fn test_config_debug_redacts_secrets() {
        let mut config = test_config();
        config.session_secret = SecretString::from("super_secret_session_value");
        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("localhost:9000"));
        assert!(!debug_output.contains("super_secret_session_value"));
    }
}
