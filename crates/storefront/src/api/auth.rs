//! Account endpoints.

use bazaar_core::models::AuthSession;
use reqwest::Method;
use serde::Serialize;
use tracing::instrument;

use super::{ApiClient, ApiError};

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

impl ApiClient {
    /// `POST /api/users/login`.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the request fails.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, ApiError> {
        let request = self
            .request(Method::POST, "/api/users/login", None)?
            .json(&LoginRequest { email, password });
        self.send(request).await
    }

    /// `POST /api/users/register`.
    ///
    /// # Errors
    ///
    /// Returns an error if the account cannot be created or the request fails.
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, ApiError> {
        let request = self
            .request(Method::POST, "/api/users/register", None)?
            .json(&RegisterRequest {
                name,
                email,
                password,
            });
        self.send(request).await
    }
}
