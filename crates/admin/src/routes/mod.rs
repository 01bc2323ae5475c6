//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! # Auth (backend credentials, admin role required)
//! GET  /auth/login              - Login page
//! POST /auth/login              - Log in
//! POST /auth/logout             - Logout
//!
//! # Dashboard
//! GET  /                        - Totals + recent orders
//! GET  /dashboard/metrics       - Metrics fragment (polled every 10 s)
//!
//! # Users
//! GET  /users                   - List + add form
//! POST /users                   - Add user (returns row)
//! POST /users/{id}              - Update name/email/role (returns row)
//! POST /users/{id}/delete       - Delete user (removes row)
//!
//! # Products
//! GET  /products                - List + create form
//! POST /products                - Create product (returns row)
//! GET  /products/{id}/edit      - Edit form
//! POST /products/{id}           - Update (multipart, optional image)
//! POST /products/{id}/delete    - Delete product (removes row)
//!
//! # Orders
//! GET  /orders                  - List orders
//! POST /orders/{id}/status      - Change status (returns row)
//! POST /orders/{id}/delete      - Delete order (removes row)
//! ```

pub mod auth;
pub mod dashboard;
pub mod orders;
pub mod products;
pub mod users;

use axum::{
    Router,
    response::AppendHeaders,
    routing::{get, post},
};
use bazaar_core::toast::Toast;

use crate::models::CurrentAdmin;
use crate::state::AppState;

/// Admin user view for templates.
#[derive(Debug, Clone)]
pub struct AdminUserView {
    pub name: String,
    pub email: String,
}

impl From<&CurrentAdmin> for AdminUserView {
    fn from(admin: &CurrentAdmin) -> Self {
        Self {
            name: admin.user.name.clone(),
            email: admin.user.email.to_string(),
        }
    }
}

/// `HX-Trigger` header raising the toast event on the page.
#[must_use]
pub fn toast_trigger(toast: &Toast) -> AppendHeaders<[(&'static str, String); 1]> {
    AppendHeaders([("HX-Trigger", toast.hx_trigger(&[]))])
}

/// Build the admin router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .route("/", get(dashboard::dashboard))
        .route("/dashboard/metrics", get(dashboard::metrics))
        .route("/users", get(users::index).post(users::create))
        .route("/users/{id}", post(users::update))
        .route("/users/{id}/delete", post(users::delete))
        .route("/products", get(products::index).post(products::create))
        .route("/products/{id}/edit", get(products::edit))
        .route("/products/{id}", post(products::update))
        .route("/products/{id}/delete", post(products::delete))
        .route("/orders", get(orders::index))
        .route("/orders/{id}/status", post(orders::update_status))
        .route("/orders/{id}/delete", post(orders::delete))
}
