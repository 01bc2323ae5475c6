//! Authentication route handlers for admin.
//!
//! Admins sign in with their shop credentials. The backend issues the token;
//! the console only lets the session in when the account's role is `admin`.

use askama::Template;
use axum::{
    Form, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use bazaar_core::messages;
use bazaar_core::toast::Toast;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{clear_current_admin, set_current_admin};
use crate::models::{AdminSession, CurrentAdmin};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Login page template.
#[derive(Template)]
#[template(path = "auth/login.html")]
pub struct LoginPageTemplate {
    pub email: String,
    pub toast: Option<Toast>,
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", get(login_page).post(login))
        .route("/auth/logout", axum::routing::post(logout))
}

/// GET /auth/login
async fn login_page(session: AdminSession) -> Result<Html<String>> {
    let template = LoginPageTemplate {
        email: String::new(),
        toast: session.take_flash().await?,
    };
    Ok(Html(template.render()?))
}

/// POST /auth/login
#[instrument(skip(state, session, form), fields(email = %form.email))]
async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let rejected = |status: StatusCode, message: String, email: String| -> Result<Response> {
        let template = LoginPageTemplate {
            email,
            toast: Some(Toast::error(message)),
        };
        Ok((status, Html(template.render()?)).into_response())
    };

    let login = match state.api().login(form.email.trim(), &form.password).await {
        Ok(login) => login,
        Err(e) => {
            tracing::warn!("Admin login failed: {e}");
            return rejected(
                StatusCode::UNAUTHORIZED,
                e.user_message(messages::LOGIN_FAILED),
                form.email,
            );
        }
    };

    if !login.user.role.is_admin() {
        tracing::warn!(user_id = %login.user.id, "Non-admin tried to sign in to the console");
        return rejected(
            StatusCode::FORBIDDEN,
            messages::NOT_AN_ADMIN.to_string(),
            form.email,
        );
    }

    let admin = CurrentAdmin::from(login);
    session.cycle_id().await?;
    set_current_admin(&session, &admin).await?;
    set_sentry_user(&admin.user.id, Some(admin.user.email.as_str()));
    tracing::info!(admin_id = %admin.user.id, "Admin logged in");

    Ok(Redirect::to("/").into_response())
}

/// POST /auth/logout
async fn logout(session: Session) -> impl IntoResponse {
    if let Err(e) = clear_current_admin(&session).await {
        tracing::warn!("Failed to clear admin session: {e}");
    }
    clear_sentry_user();

    Redirect::to("/auth/login")
}
