//! Authentication route handlers.
//!
//! Login and registration go through the backend. On success the guest cart
//! is merged into the user's cart and the user's cart is fetched again, so
//! whatever the shopper added before logging in is still there.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use bazaar_core::models::{AuthSession, User};
use bazaar_core::store::{AuthState, BearerToken, CartState};
use bazaar_core::toast::Toast;
use bazaar_core::{CartOwner, GuestId, messages};
use serde::Deserialize;
use tracing::instrument;

use super::PageContext;
use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::middleware::safe_redirect;
use crate::models::ShopperSession;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub redirect: Option<String>,
}

#[derive(Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    #[serde(default)]
    pub redirect: Option<String>,
}

/// `?redirect=` carried through the auth pages.
#[derive(Debug, Deserialize)]
pub struct RedirectQuery {
    pub redirect: Option<String>,
}

#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub page: PageContext,
    pub email: String,
    pub redirect: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub page: PageContext,
    pub name: String,
    pub email: String,
    pub redirect: String,
}

// =============================================================================
// Cart merge
// =============================================================================

/// Fold the guest cart into the user's cart, then reload the user's cart.
///
/// A failed merge is logged and otherwise ignored; the re-fetch runs either
/// way.
#[instrument(skip(state, session, user, token), fields(user_id = %user.id))]
pub async fn merge_guest_cart(
    state: &AppState,
    session: &ShopperSession,
    guest_id: &GuestId,
    user: &User,
    token: &BearerToken,
) -> Result<()> {
    if let Err(e) = state.api().merge_cart(guest_id, user, token).await {
        tracing::warn!("{}: {e}", messages::MERGE_CART_FAILED);
    }

    let mut cart = session.load::<CartState>().await?;
    cart.begin();
    match state.api().get_cart(&CartOwner::User(user.id.clone())).await {
        Ok(fetched) => cart.received(fetched),
        Err(e) => cart.reject(e.user_message(messages::FETCH_CART_FAILED)),
    }
    session.save(&cart).await?;
    Ok(())
}

/// Store a successful login and bring the cart along.
async fn complete_login(
    state: &AppState,
    session: &ShopperSession,
    mut auth: AuthState,
    login: AuthSession,
) -> Result<()> {
    let guest_id = auth.guest_id().clone();
    auth.logged_in(login);
    session.inner().cycle_id().await?;
    session.save(&auth).await?;

    if let Some((user, token)) = auth.credentials() {
        set_sentry_user(&user.id, Some(user.email.as_str()));
        tracing::info!(user_id = %user.id, "Shopper logged in");
        merge_guest_cart(state, session, &guest_id, user, token).await?;
    }
    Ok(())
}

// =============================================================================
// Login
// =============================================================================

pub async fn login_page(page: PageContext, Query(query): Query<RedirectQuery>) -> LoginTemplate {
    LoginTemplate {
        page,
        email: String::new(),
        redirect: query.redirect.unwrap_or_default(),
    }
}

/// Handle login form submission.
#[instrument(skip(state, session, page, form))]
pub async fn login(
    State(state): State<AppState>,
    session: ShopperSession,
    page: PageContext,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let mut auth = session.auth().await?;
    auth.begin();

    match state.api().login(form.email.trim(), &form.password).await {
        Ok(login) => {
            complete_login(&state, &session, auth, login).await?;
            let target = safe_redirect(form.redirect.as_deref());
            Ok(Redirect::to(target).into_response())
        }
        Err(e) => {
            tracing::warn!("Login failed: {e}");
            let message = e.user_message(messages::LOGIN_FAILED);
            auth.reject(message.clone());
            session.save(&auth).await?;
            Ok((
                StatusCode::UNAUTHORIZED,
                LoginTemplate {
                    page: page.with_toast(Toast::error(message)),
                    email: form.email,
                    redirect: form.redirect.unwrap_or_default(),
                },
            )
                .into_response())
        }
    }
}

// =============================================================================
// Registration
// =============================================================================

pub async fn register_page(
    page: PageContext,
    Query(query): Query<RedirectQuery>,
) -> RegisterTemplate {
    RegisterTemplate {
        page,
        name: String::new(),
        email: String::new(),
        redirect: query.redirect.unwrap_or_default(),
    }
}

/// Handle registration form submission.
///
/// Mismatched passwords are rejected before the backend is called.
#[instrument(skip(state, session, page, form))]
pub async fn register(
    State(state): State<AppState>,
    session: ShopperSession,
    page: PageContext,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    let rerender = |page: PageContext, status: StatusCode, message: String, form: RegisterForm| {
        (
            status,
            RegisterTemplate {
                page: page.with_toast(Toast::error(message)),
                name: form.name,
                email: form.email,
                redirect: form.redirect.unwrap_or_default(),
            },
        )
            .into_response()
    };

    if form.password != form.password_confirm {
        return Ok(rerender(
            page,
            StatusCode::UNPROCESSABLE_ENTITY,
            messages::PASSWORDS_DO_NOT_MATCH.to_string(),
            form,
        ));
    }

    let mut auth = session.auth().await?;
    auth.begin();

    match state
        .api()
        .register(form.name.trim(), form.email.trim(), &form.password)
        .await
    {
        Ok(login) => {
            complete_login(&state, &session, auth, login).await?;
            let target = safe_redirect(form.redirect.as_deref());
            Ok(Redirect::to(target).into_response())
        }
        Err(e) => {
            tracing::warn!("Registration failed: {e}");
            let message = e.user_message(messages::REGISTRATION_FAILED);
            auth.reject(message.clone());
            session.save(&auth).await?;
            Ok(rerender(page, StatusCode::BAD_REQUEST, message, form))
        }
    }
}

// =============================================================================
// Logout
// =============================================================================

/// Log out: forget the user, start a new guest identity and drop the cached
/// cart, checkout and orders.
#[instrument(skip(session))]
pub async fn logout(session: ShopperSession) -> Result<Redirect> {
    session.reset_shopper().await?;
    clear_sentry_user();
    Ok(Redirect::to("/"))
}
