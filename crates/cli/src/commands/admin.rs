//! Admin user management commands.
//!
//! Accounts live in the backend, so a new admin is created through the
//! admin API while signed in as an existing one.
//!
//! # Usage
//!
//! ```bash
//! BZ_ADMIN_EMAIL=ops@example.com BZ_ADMIN_PASSWORD=... \
//!   bz-cli admin create -e new@example.com -n "New Admin" -p 'secret'
//! ```
//!
//! # Environment Variables
//!
//! - `BACKEND_URL` - REST backend base URL
//! - `BZ_ADMIN_EMAIL` / `BZ_ADMIN_PASSWORD` - operator credentials

use bazaar_admin::api::NewUser;
use bazaar_core::{Email, Role};

use super::{CommandError, Credentials, sign_in};

/// Create a new admin user.
///
/// # Returns
///
/// The backend id of the created user.
///
/// # Errors
///
/// Returns an error if the input is invalid, the operator cannot sign in,
/// or the backend rejects the new user.
pub async fn create_user(
    operator: &Credentials,
    email: &str,
    name: &str,
    password: String,
) -> Result<String, CommandError> {
    let email = Email::parse(email).map_err(|e| CommandError::Invalid(e.to_string()))?;
    if name.trim().is_empty() || password.is_empty() {
        return Err(CommandError::Invalid(
            "name and password are required".to_string(),
        ));
    }

    let (api, token) = sign_in(operator).await?;

    tracing::info!("Creating admin user: {}", email);
    let user = api
        .create_user(
            &token,
            &NewUser {
                name: name.trim().to_string(),
                email: email.into_inner(),
                password,
                role: Role::Admin,
            },
        )
        .await?;

    tracing::info!(
        "Admin user created successfully! ID: {}, Email: {}",
        user.id,
        user.email
    );
    Ok(user.id.to_string())
}
