//! Checkout route handlers.
//!
//! Checkout is two steps on one page. The shipping form creates a checkout
//! on the backend; the page then shows the PayPal button for its total.
//! PayPal's approval is posted back as JSON to the capture endpoint, which
//! marks the checkout paid, finalizes it into an order and empties the
//! cart.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use bazaar_core::checkout::{CheckoutForm, CheckoutRequest, PaymentConfirmation};
use bazaar_core::store::{CartState, CheckoutState, OrdersState};
use bazaar_core::toast::Toast;
use bazaar_core::{CheckoutId, OrderId, messages};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::PageContext;
use super::account::{OrderView, load_order_details};
use super::cart::CartView;
use crate::error::{Result, add_breadcrumb};
use crate::middleware::RequireAuth;
use crate::models::{CurrentUser, ShopperSession};
use crate::state::AppState;

/// What the PayPal button needs.
#[derive(Clone, Debug)]
pub struct PaymentStep {
    pub checkout_id: String,
    /// Two decimals, no symbol.
    pub amount: String,
    pub currency: &'static str,
    pub sdk_url: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub page: PageContext,
    pub form: CheckoutForm,
    pub cart: CartView,
    pub payment: Option<PaymentStep>,
}

#[derive(Template, WebTemplate)]
#[template(path = "checkout/confirmation.html")]
pub struct ConfirmationTemplate {
    pub page: PageContext,
    pub order: OrderView,
}

/// PayPal's approval details, as the button callback posts them.
#[derive(Debug, Deserialize)]
pub struct CaptureRequest {
    pub details: serde_json::Value,
}

/// Reply to the capture call; the page navigates to `redirect` or shows
/// `error`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CaptureResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CaptureResponse {
    fn failed(status: StatusCode, message: impl Into<String>) -> Response {
        (
            status,
            Json(Self {
                redirect: None,
                error: Some(message.into()),
            }),
        )
            .into_response()
    }
}

fn payment_step(state: &AppState, checkout: &CheckoutState) -> Option<PaymentStep> {
    let paypal = &state.config().paypal;
    checkout.current().map(|current| PaymentStep {
        checkout_id: current.id.to_string(),
        amount: current.total().to_fixed(),
        currency: paypal.currency.code(),
        sdk_url: paypal.sdk_url(),
    })
}

/// Show the shipping form, or the payment step once a checkout exists.
#[instrument(skip_all, fields(user_id = %current.user.id))]
pub async fn show(
    State(state): State<AppState>,
    session: ShopperSession,
    page: PageContext,
    RequireAuth(current): RequireAuth,
) -> Result<Response> {
    let cart = session.load::<CartState>().await?;
    if cart.data.is_empty() {
        session.flash(Toast::error(messages::CART_EMPTY)).await?;
        return Ok(Redirect::to("/cart").into_response());
    }
    let checkout = session.load::<CheckoutState>().await?;

    Ok(CheckoutTemplate {
        page,
        form: CheckoutForm::for_email(&current.user.email),
        cart: CartView::from(&cart.data),
        payment: payment_step(&state, &checkout),
    }
    .into_response())
}

/// Validate the shipping form and create the checkout.
#[instrument(skip_all, fields(user_id = %current.user.id))]
pub async fn create(
    State(state): State<AppState>,
    session: ShopperSession,
    page: PageContext,
    RequireAuth(current): RequireAuth,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let cart = session.load::<CartState>().await?;
    let rerender = |page: PageContext, status: StatusCode, message: String, form: CheckoutForm| {
        (
            status,
            CheckoutTemplate {
                page: page.with_toast(Toast::error(message)),
                form,
                cart: CartView::from(&cart.data),
                payment: None,
            },
        )
            .into_response()
    };

    if let Err(invalid) = form.validate(&cart.data) {
        return Ok(rerender(
            page,
            StatusCode::UNPROCESSABLE_ENTITY,
            invalid.to_string(),
            form,
        ));
    }

    let request = CheckoutRequest::from_cart(&cart.data, &form);
    let mut checkout = session.load::<CheckoutState>().await?;
    checkout.begin();

    match state.api().create_checkout(&current.token, &request).await {
        Ok(created) => {
            tracing::info!(checkout_id = %created.id, "Checkout created");
            checkout.created(created);
            session.save(&checkout).await?;
            Ok(Redirect::to("/checkout").into_response())
        }
        Err(e) => {
            tracing::warn!("Failed to create checkout: {e}");
            let message = e.user_message(messages::CREATE_CHECKOUT_FAILED);
            checkout.reject(message.clone());
            session.save(&checkout).await?;
            Ok(rerender(page, StatusCode::BAD_GATEWAY, message, form))
        }
    }
}

/// Mark the checkout paid and finalize it into an order.
async fn settle_payment(
    state: &AppState,
    current: &CurrentUser,
    id: &CheckoutId,
    details: serde_json::Value,
) -> std::result::Result<bazaar_core::models::Order, crate::api::ApiError> {
    state
        .api()
        .mark_checkout_paid(&current.token, id, &PaymentConfirmation::paid(details))
        .await?;
    state.api().finalize_checkout(&current.token, id).await
}

/// Relay a PayPal approval (JSON).
#[instrument(skip_all, fields(user_id = %current.user.id, checkout_id = %id))]
pub async fn capture(
    State(state): State<AppState>,
    session: ShopperSession,
    RequireAuth(current): RequireAuth,
    Path(id): Path<String>,
    Json(body): Json<CaptureRequest>,
) -> Result<Response> {
    let id = CheckoutId::new(id);
    let mut checkout = session.load::<CheckoutState>().await?;
    if checkout.current().is_none_or(|pending| pending.id != id) {
        return Ok(CaptureResponse::failed(
            StatusCode::NOT_FOUND,
            messages::CHECKOUT_NOT_FOUND,
        ));
    }

    checkout.begin();
    match settle_payment(&state, &current, &id, body.details).await {
        Ok(order) => {
            add_breadcrumb(
                "checkout",
                "Payment captured",
                Some(&[("order_id", order.id.as_str())]),
            );
            tracing::info!(order_id = %order.id, "Order finalized");
            let redirect = format!("/order-confirmation/{}", order.id);

            checkout.clear();
            session.save(&checkout).await?;
            let mut cart = session.load::<CartState>().await?;
            cart.clear();
            session.save(&cart).await?;
            let mut orders = session.load::<OrdersState>().await?;
            orders.details(order);
            session.save(&orders).await?;
            session.flash(Toast::success(messages::PAYMENT_SUCCEEDED)).await?;

            Ok(Json(CaptureResponse {
                redirect: Some(redirect),
                error: None,
            })
            .into_response())
        }
        Err(e) => {
            tracing::error!("Payment capture failed: {e}");
            checkout.reject(messages::PAYMENT_FAILED);
            session.save(&checkout).await?;
            Ok(CaptureResponse::failed(
                StatusCode::BAD_GATEWAY,
                messages::PAYMENT_FAILED,
            ))
        }
    }
}

/// Order confirmation page.
#[instrument(skip_all, fields(user_id = %current.user.id, order_id = %id))]
pub async fn confirmation(
    State(state): State<AppState>,
    session: ShopperSession,
    page: PageContext,
    RequireAuth(current): RequireAuth,
    Path(id): Path<String>,
) -> Result<ConfirmationTemplate> {
    let order = load_order_details(&state, &session, &current.token, &OrderId::new(id)).await?;
    Ok(ConfirmationTemplate {
        page,
        order: OrderView::from(&order),
    })
}
