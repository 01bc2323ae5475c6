//! Command implementations.

pub mod admin;
pub mod migrate;
pub mod seed;

use bazaar_admin::api::{ApiClient, ApiError};
use bazaar_core::env::{self, ConfigError};
use bazaar_core::store::BearerToken;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Errors shared by the backend-facing commands.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Backend error: {0}")]
    Api(#[from] ApiError),

    /// The operator account exists but is not an admin.
    #[error("{0} is not an admin account")]
    NotAnAdmin(String),

    #[error("Invalid input: {0}")]
    Invalid(String),
}

/// Credentials of the admin the command acts as.
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

/// Build a backend client from `BACKEND_URL` and sign in as the operator.
///
/// # Errors
///
/// Returns an error if `BACKEND_URL` is unset, the login fails, or the
/// account is not an admin.
pub async fn sign_in(operator: &Credentials) -> Result<(ApiClient, BearerToken), CommandError> {
    let backend_url = env::required("BACKEND_URL")?;
    let api = ApiClient::new(&backend_url)?;

    tracing::info!(backend = %backend_url, email = %operator.email, "Signing in");
    let session = api
        .login(&operator.email, operator.password.expose_secret())
        .await?;
    if !session.user.role.is_admin() {
        return Err(CommandError::NotAnAdmin(operator.email.clone()));
    }

    Ok((api, BearerToken::new(session.token)))
}
