use bazaar_core::Role;
use bazaar_core::models::User;
use bazaar_core::store::BearerToken;
use bazaar_core::types::UserId;
use reqwest::Method;
use serde::Serialize;
use tracing::instrument;

use super::{ApiClient, ApiError, segment};

/// Body for `POST /api/admin/users`.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Body for `PUT /api/admin/users/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct UserUpdate {
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns an error if the request fails or the token is not an admin's.
    #[instrument(skip(self, token))]
    pub async fn list_users(&self, token: &BearerToken) -> Result<Vec<User>, ApiError> {
        let request = self.request(Method::GET, "/api/admin/users", Some(token))?;
        self.send(request).await
    }

    /// # Errors
    ///
    /// Returns an error if the backend rejects the user or the request fails.
    #[instrument(skip(self, token, user), fields(email = %user.email))]
    pub async fn create_user(&self, token: &BearerToken, user: &NewUser) -> Result<User, ApiError> {
        let request = self
            .request(Method::POST, "/api/admin/users", Some(token))?
            .json(user);
        self.send(request).await
    }

    /// # Errors
    ///
    /// Returns an error if the backend rejects the update or the request fails.
    #[instrument(skip(self, token, update))]
    pub async fn update_user(
        &self,
        token: &BearerToken,
        id: &UserId,
        update: &UserUpdate,
    ) -> Result<User, ApiError> {
        let path = format!("/api/admin/users/{}", segment(id.as_str()));
        let request = self.request(Method::PUT, &path, Some(token))?.json(update);
        self.send(request).await
    }

    /// # Errors
    ///
    /// Returns an error if the backend refuses the deletion or the request
    /// fails.
    #[instrument(skip(self, token))]
    pub async fn delete_user(&self, token: &BearerToken, id: &UserId) -> Result<(), ApiError> {
        let path = format!("/api/admin/users/{}", segment(id.as_str()));
        let request = self.request(Method::DELETE, &path, Some(token))?;
        self.send_discarding(request).await
    }
}
