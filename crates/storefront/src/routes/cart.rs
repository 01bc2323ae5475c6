//! Cart route handlers.
//!
//! Cart mutations are HTMX requests. Each one asks the backend to change the
//! cart, stores the returned cart in the session and answers with a fragment
//! plus an `HX-Trigger` carrying a toast and `cart-updated`, which makes the
//! header badge refresh itself. A failed mutation leaves the cached cart
//! untouched and only records the error.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bazaar_core::ProductId;
use bazaar_core::messages;
use bazaar_core::models::Cart;
use bazaar_core::store::CartState;
use bazaar_core::toast::Toast;
use serde::Deserialize;
use tracing::instrument;

use super::{PageContext, toast_trigger};
use crate::api::{ApiError, CartItemInput};
use crate::error::{Result, add_breadcrumb};
use crate::models::ShopperSession;
use crate::state::AppState;

/// Client event that refreshes the header badge.
pub const CART_UPDATED_EVENT: &str = "cart-updated";

/// Cart line display data for templates.
#[derive(Clone, Debug)]
pub struct CartLineView {
    pub product_id: String,
    pub name: String,
    pub image: String,
    pub size: String,
    pub color: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

/// Cart display data for templates.
#[derive(Clone, Debug)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            lines: cart
                .products
                .iter()
                .map(|line| CartLineView {
                    product_id: line.product_id.to_string(),
                    name: line.name.clone(),
                    image: line.image.clone(),
                    size: line.size.clone(),
                    color: line.color.clone(),
                    quantity: line.quantity,
                    price: bazaar_core::Price::usd(line.price).display(),
                    line_price: bazaar_core::Price::usd(line.line_total()).display(),
                })
                .collect(),
            subtotal: cart.subtotal().display(),
            item_count: cart.item_count(),
        }
    }
}

// =============================================================================
// Forms
// =============================================================================

/// Add to cart form data. Size and color arrive empty when not chosen.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub color: String,
    pub quantity: Option<u32>,
}

/// Line update form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub size: String,
    pub color: String,
    pub quantity: u32,
}

/// Line removal form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
    pub size: String,
    pub color: String,
}

// =============================================================================
// Templates
// =============================================================================

#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub page: PageContext,
    pub cart: CartView,
    pub error: Option<String>,
}

/// Cart lines fragment (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
    pub error: Option<String>,
}

/// Cart count badge fragment (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

// =============================================================================
// Helpers
// =============================================================================

/// Answer for a failed mutation: the unchanged fragment plus an error toast.
fn mutation_failed(cart: &CartState, status: StatusCode, message: String) -> Response {
    let toast = Toast::error(message.clone());
    (
        status,
        toast_trigger(&toast, &[]),
        CartItemsTemplate {
            cart: CartView::from(&cart.data),
            error: Some(message),
        },
    )
        .into_response()
}

/// Store a mutation's outcome in the cart namespace.
async fn apply_mutation(
    session: &ShopperSession,
    cart: &mut CartState,
    result: std::result::Result<Cart, ApiError>,
    fallback: &str,
) -> Result<std::result::Result<(), String>> {
    let outcome = match result {
        Ok(updated) => {
            cart.received(updated);
            Ok(())
        }
        Err(e) => {
            tracing::warn!("Cart mutation failed: {e}");
            let message = e.user_message(fallback);
            cart.reject(message.clone());
            Err(message)
        }
    };
    session.save(cart).await?;
    Ok(outcome)
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart page.
///
/// Shows the backend's cart; if that fetch fails, the cached copy is shown
/// with the error.
#[instrument(skip(state, session, page))]
pub async fn show(
    State(state): State<AppState>,
    session: ShopperSession,
    page: PageContext,
) -> Result<CartShowTemplate> {
    let auth = session.auth().await?;
    let mut cart = session.load::<CartState>().await?;
    cart.begin();

    match state.api().get_cart(&auth.cart_owner()).await {
        Ok(fetched) => cart.received(fetched),
        Err(e) => {
            tracing::warn!("Failed to fetch cart: {e}");
            cart.reject(e.user_message(messages::FETCH_CART_FAILED));
        }
    }
    session.save(&cart).await?;

    Ok(CartShowTemplate {
        page,
        cart: CartView::from(&cart.data),
        error: cart.error,
    })
}

/// Add a product variant to the cart (HTMX).
///
/// Returns the new count badge. Size and color must both be chosen.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: ShopperSession,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    if form.size.trim().is_empty() || form.color.trim().is_empty() {
        let toast = Toast::error(messages::SELECT_SIZE_AND_COLOR);
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, toast_trigger(&toast, &[])).into_response());
    }

    let auth = session.auth().await?;
    let mut cart = session.load::<CartState>().await?;
    cart.begin();

    let item = CartItemInput {
        product_id: ProductId::new(form.product_id),
        size: form.size,
        color: form.color,
        quantity: form.quantity.unwrap_or(1).max(1),
    };
    let result = state.api().add_to_cart(&auth.cart_owner(), &item).await;

    match apply_mutation(&session, &mut cart, result, messages::ADD_TO_CART_FAILED).await? {
        Ok(()) => {
            add_breadcrumb(
                "cart",
                "Added to cart",
                Some(&[("product_id", item.product_id.as_str())]),
            );
            let toast = Toast::success(messages::ADDED_TO_CART);
            Ok((
                toast_trigger(&toast, &[CART_UPDATED_EVENT]),
                CartCountTemplate {
                    count: cart.item_count(),
                },
            )
                .into_response())
        }
        Err(message) => {
            let toast = Toast::error(message);
            Ok((StatusCode::BAD_GATEWAY, toast_trigger(&toast, &[])).into_response())
        }
    }
}

/// Set a line's quantity (HTMX). Zero removes the line.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: ShopperSession,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let auth = session.auth().await?;
    let owner = auth.cart_owner();
    let mut cart = session.load::<CartState>().await?;
    cart.begin();

    let item = CartItemInput {
        product_id: ProductId::new(form.product_id),
        size: form.size,
        color: form.color,
        quantity: form.quantity,
    };
    let (result, fallback) = if item.quantity == 0 {
        (
            state.api().remove_from_cart(&owner, &item).await,
            messages::REMOVE_FROM_CART_FAILED,
        )
    } else {
        (
            state.api().update_cart_quantity(&owner, &item).await,
            messages::UPDATE_CART_FAILED,
        )
    };

    match apply_mutation(&session, &mut cart, result, fallback).await? {
        Ok(()) => Ok(lines_updated(&cart)),
        Err(message) => Ok(mutation_failed(&cart, StatusCode::BAD_GATEWAY, message)),
    }
}

/// Remove a line entirely (HTMX).
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: ShopperSession,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let auth = session.auth().await?;
    let mut cart = session.load::<CartState>().await?;
    cart.begin();

    let item = CartItemInput {
        product_id: ProductId::new(form.product_id),
        size: form.size,
        color: form.color,
        quantity: 0,
    };
    let result = state.api().remove_from_cart(&auth.cart_owner(), &item).await;

    match apply_mutation(&session, &mut cart, result, messages::REMOVE_FROM_CART_FAILED).await? {
        Ok(()) => Ok(lines_updated(&cart)),
        Err(message) => Ok(mutation_failed(&cart, StatusCode::BAD_GATEWAY, message)),
    }
}

fn lines_updated(cart: &CartState) -> Response {
    (
        axum::response::AppendHeaders([(
            "HX-Trigger",
            format!("{{\"{CART_UPDATED_EVENT}\":null}}"),
        )]),
        CartItemsTemplate {
            cart: CartView::from(&cart.data),
            error: None,
        },
    )
        .into_response()
}

/// Cart count badge (HTMX), read from the cached cart.
#[instrument(skip(session))]
pub async fn count(session: ShopperSession) -> Result<CartCountTemplate> {
    let cart = session.load::<CartState>().await?;
    Ok(CartCountTemplate {
        count: cart.item_count(),
    })
}

#[cfg(test)]
mod tests {
    use bazaar_core::models::CartLine;
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_cart_view_formats_lines() {
        let cart = Cart {
            products: vec![CartLine {
                product_id: ProductId::new("p1"),
                name: "Tee".into(),
                image: String::new(),
                price: Decimal::new(1250, 2),
                size: "M".into(),
                color: "Black".into(),
                quantity: 3,
            }],
            ..Cart::default()
        };

        let view = CartView::from(&cart);
        assert_eq!(view.item_count, 3);
        assert_eq!(view.subtotal, "$37.50");
        assert_eq!(view.lines.first().map(|l| l.line_price.as_str()), Some("$37.50"));
    }
}
