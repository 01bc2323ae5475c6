//! User management route handlers.
//!
//! Mutations answer with the affected table row (or nothing, for deletes)
//! and raise a toast through `HX-Trigger`.

use askama::Template;
use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use bazaar_core::models::User;
use bazaar_core::store::AdminUsersState;
use bazaar_core::toast::Toast;
use bazaar_core::types::UserId;
use bazaar_core::{Email, Role, messages};
use serde::Deserialize;
use tracing::instrument;

use super::{AdminUserView, toast_trigger};
use crate::api::{NewUser, UserUpdate};
use crate::error::Result;
use crate::middleware::RequireAdminAuth;
use crate::models::AdminSession;
use crate::state::AppState;

/// User row view for templates.
#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub is_admin: bool,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.to_string(),
            role: user.role.to_string(),
            is_admin: user.role.is_admin(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NewUserForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
}

impl NewUserForm {
    /// Name, email and password are all required.
    ///
    /// # Errors
    ///
    /// Returns the message to show when a field is missing or malformed.
    pub fn validate(self) -> std::result::Result<NewUser, String> {
        let name = self.name.trim();
        if name.is_empty() || self.email.trim().is_empty() || self.password.is_empty() {
            return Err(messages::FILL_ALL_FIELDS.to_string());
        }
        let email = Email::parse(&self.email).map_err(|e| e.to_string())?;
        let role = parse_role(self.role.as_deref())?;

        Ok(NewUser {
            name: name.to_string(),
            email: email.into_inner(),
            password: self.password,
            role,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserForm {
    pub name: String,
    pub email: String,
    pub role: String,
}

impl UpdateUserForm {
    /// # Errors
    ///
    /// Returns the message to show when a field is missing or malformed.
    pub fn validate(self) -> std::result::Result<UserUpdate, String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(messages::FILL_ALL_FIELDS.to_string());
        }
        let email = Email::parse(&self.email).map_err(|e| e.to_string())?;
        Ok(UserUpdate {
            name: name.to_string(),
            email: email.into_inner(),
            role: parse_role(Some(&self.role))?,
        })
    }
}

fn parse_role(role: Option<&str>) -> std::result::Result<Role, String> {
    match role.map(str::trim) {
        None | Some("") => Ok(Role::Customer),
        Some(role) => role.parse(),
    }
}

/// Users page template.
#[derive(Template)]
#[template(path = "users/index.html")]
pub struct UsersIndexTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub toast: Option<Toast>,
    pub users: Vec<UserRow>,
    pub error: Option<String>,
}

/// One `<tr>` for the users table.
#[derive(Template)]
#[template(path = "users/row.html")]
pub struct UserRowTemplate {
    pub user: UserRow,
}

/// A failed mutation: toast only, nothing to swap.
fn failed(status: StatusCode, message: String) -> Response {
    (status, toast_trigger(&Toast::error(message))).into_response()
}

/// Users list page handler.
#[instrument(skip_all)]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: AdminSession,
) -> Result<Html<String>> {
    let mut users = session.load::<AdminUsersState>().await?;
    users.begin();
    match state.api().list_users(&admin.token).await {
        Ok(list) => users.listed(list),
        Err(e) => {
            tracing::error!("Failed to fetch users: {e}");
            users.reject(e.user_message(messages::FETCH_USERS_FAILED));
        }
    }
    session.save(&users).await?;

    let template = UsersIndexTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: "/users".to_string(),
        toast: session.take_flash().await?,
        users: users.data.users.iter().map(UserRow::from).collect(),
        error: users.error,
    };
    Ok(Html(template.render()?))
}

/// POST /users
#[instrument(skip_all)]
pub async fn create(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: AdminSession,
    Form(form): Form<NewUserForm>,
) -> Result<Response> {
    let new_user = match form.validate() {
        Ok(user) => user,
        Err(message) => return Ok(failed(StatusCode::UNPROCESSABLE_ENTITY, message)),
    };

    let mut users = session.load::<AdminUsersState>().await?;
    match state.api().create_user(&admin.token, &new_user).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "User added");
            let row = UserRowTemplate {
                user: UserRow::from(&user),
            };
            users.added(user);
            session.save(&users).await?;
            Ok((
                toast_trigger(&Toast::success("User added successfully")),
                Html(row.render()?),
            )
                .into_response())
        }
        Err(e) => {
            tracing::warn!("Failed to add user: {e}");
            let message = e.user_message(messages::ADD_USER_FAILED);
            users.reject(message.clone());
            session.save(&users).await?;
            Ok(failed(StatusCode::BAD_GATEWAY, message))
        }
    }
}

/// POST /users/{id}
#[instrument(skip(admin, state, session, form))]
pub async fn update(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<String>,
    Form(form): Form<UpdateUserForm>,
) -> Result<Response> {
    let update = match form.validate() {
        Ok(update) => update,
        Err(message) => return Ok(failed(StatusCode::UNPROCESSABLE_ENTITY, message)),
    };

    let mut users = session.load::<AdminUsersState>().await?;
    match state
        .api()
        .update_user(&admin.token, &UserId::new(id), &update)
        .await
    {
        Ok(user) => {
            let row = UserRowTemplate {
                user: UserRow::from(&user),
            };
            users.updated(user);
            session.save(&users).await?;
            Ok((
                toast_trigger(&Toast::success("User updated")),
                Html(row.render()?),
            )
                .into_response())
        }
        Err(e) => {
            tracing::warn!("Failed to update user: {e}");
            let message = e.user_message(messages::UPDATE_USER_FAILED);
            users.reject(message.clone());
            session.save(&users).await?;
            Ok(failed(StatusCode::BAD_GATEWAY, message))
        }
    }
}

/// POST /users/{id}/delete
#[instrument(skip(admin, state, session))]
pub async fn delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<String>,
) -> Result<Response> {
    let id = UserId::new(id);
    if id == admin.user.id {
        return Ok(failed(
            StatusCode::UNPROCESSABLE_ENTITY,
            "You cannot delete your own account".to_string(),
        ));
    }

    let mut users = session.load::<AdminUsersState>().await?;
    match state.api().delete_user(&admin.token, &id).await {
        Ok(()) => {
            users.deleted(&id);
            session.save(&users).await?;
            Ok((
                toast_trigger(&Toast::success("User deleted")),
                Html(String::new()),
            )
                .into_response())
        }
        Err(e) => {
            tracing::warn!("Failed to delete user: {e}");
            let message = e.user_message(messages::DELETE_USER_FAILED);
            users.reject(message.clone());
            session.save(&users).await?;
            Ok(failed(StatusCode::BAD_GATEWAY, message))
        }
    }
}
