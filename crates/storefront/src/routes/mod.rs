//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Home page (featured, departments, new arrivals)
//!
//! # Catalog
//! GET  /products                  - Product listing (backend filters via query)
//! GET  /products/{id}             - Product detail + similar products
//! GET  /collections/{department}  - Department page with facet filters
//! GET  /search?q=                 - Search results fragment (HTMX)
//!
//! # Cart (HTMX fragments)
//! GET  /cart                      - Cart page
//! POST /cart/add                  - Add to cart (returns count badge, triggers cart-updated)
//! POST /cart/update               - Set quantity (returns cart_items fragment)
//! POST /cart/remove               - Remove line (returns cart_items fragment)
//! GET  /cart/count                - Cart count badge (fragment)
//!
//! # Checkout (requires auth)
//! GET  /checkout                  - Shipping form, or payment step once created
//! POST /checkout                  - Validate and create the checkout
//! POST /checkout/{id}/capture     - Relay a PayPal approval (JSON)
//! GET  /order-confirmation/{id}   - Confirmation page
//!
//! # Auth
//! GET  /auth/login                - Login page
//! POST /auth/login                - Login action (merges the guest cart)
//! GET  /auth/register             - Register page
//! POST /auth/register             - Register action (merges the guest cart)
//! POST /auth/logout               - Logout action
//!
//! # Account (requires auth)
//! GET  /account                   - Profile + order history
//! GET  /account/orders/{id}       - Order detail
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod collections;
pub mod home;
pub mod products;
pub mod search;

use axum::{
    Router,
    extract::FromRequestParts,
    http::request::Parts,
    response::AppendHeaders,
    routing::{get, post},
};
use bazaar_core::store::CartState;
use bazaar_core::toast::Toast;
use tower_sessions::Session;

use crate::middleware::{CspNonce, auth_rate_limiter, cart_rate_limiter};
use crate::models::ShopperSession;
use crate::state::AppState;

/// Layout data every full page needs: header state, the one-shot toast and
/// the CSP nonce.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    pub nonce: String,
    pub user_name: Option<String>,
    pub cart_count: u32,
    pub toast: Option<Toast>,
}

impl PageContext {
    /// Show `toast` on this render, replacing any flashed one.
    #[must_use]
    pub fn with_toast(mut self, toast: Toast) -> Self {
        self.toast = Some(toast);
        self
    }
}

impl<S> FromRequestParts<S> for PageContext
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CspNonce(nonce) = CspNonce::from_request_parts(parts, state).await?;
        let Some(session) = parts.extensions.get::<Session>().cloned() else {
            return Ok(Self {
                nonce,
                ..Self::default()
            });
        };

        let session = ShopperSession::new(session);
        let user_name = match session.current_user().await {
            Ok(user) => user.map(|current| current.user.name),
            Err(e) => {
                tracing::warn!("Failed to read auth from session: {e}");
                None
            }
        };
        let cart_count = session
            .load::<CartState>()
            .await
            .map(|cart| cart.item_count())
            .unwrap_or_default();
        let toast = session.take_flash().await.unwrap_or_else(|e| {
            tracing::warn!("Failed to read flash toast: {e}");
            None
        });

        Ok(Self {
            nonce,
            user_name,
            cart_count,
            toast,
        })
    }
}

/// `HX-Trigger` header raising a toast plus any extra client events.
#[must_use]
pub fn toast_trigger(toast: &Toast, also: &[&str]) -> AppendHeaders<[(&'static str, String); 1]> {
    AppendHeaders([("HX-Trigger", toast.hx_trigger(also))])
}

/// Whether the request came from htmx and wants a fragment.
#[must_use]
pub fn is_htmx(headers: &axum::http::HeaderMap) -> bool {
    headers.contains_key("hx-request")
}

/// Auth pages. Only the credential-submitting actions are rate limited.
pub fn auth_routes() -> Router<AppState> {
    let actions = Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .layer(auth_rate_limiter());

    Router::new()
        .route("/login", get(auth::login_page))
        .route("/register", get(auth::register_page))
        .route("/logout", post(auth::logout))
        .merge(actions)
}

pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

pub fn cart_routes() -> Router<AppState> {
    let mutations = Router::new()
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .layer(cart_rate_limiter());

    Router::new()
        .route("/", get(cart::show))
        .route("/count", get(cart::count))
        .merge(mutations)
}

pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show).post(checkout::create))
        .route("/{id}/capture", post(checkout::capture))
}

pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::index))
        .route("/orders/{id}", get(account::order))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/products", product_routes())
        .route("/collections/{department}", get(collections::show))
        .route("/search", get(search::search))
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
        .route("/order-confirmation/{id}", get(checkout::confirmation))
        .nest("/account", account_routes())
        .nest("/auth", auth_routes())
}
