//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::api::{ApiClient, ApiError};
use crate::config::AdminConfig;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    pool: PgPool,
    api: ApiClient,
}

impl AppState {
    /// # Errors
    ///
    /// Returns an error if the backend URL cannot be used or the HTTP client
    /// cannot be built.
    pub fn new(config: AdminConfig, pool: PgPool) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config.backend_url)?;
        Ok(Self {
            inner: Arc::new(AppStateInner { config, pool, api }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }
}
