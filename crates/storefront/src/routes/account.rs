//! Account route handlers.
//!
//! These routes require authentication.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use bazaar_core::models::{Order, OrderItem};
use bazaar_core::store::OrdersState;
use bazaar_core::{OrderId, messages};
use tracing::instrument;

use super::PageContext;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::ShopperSession;
use crate::state::AppState;

/// User display data for templates.
#[derive(Clone, Debug)]
pub struct UserView {
    pub name: String,
    pub email: String,
}

/// Purchased line display data.
#[derive(Clone, Debug)]
pub struct OrderItemView {
    pub name: String,
    pub image: String,
    pub size: String,
    pub color: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

impl From<&OrderItem> for OrderItemView {
    fn from(item: &OrderItem) -> Self {
        Self {
            name: item.name.clone(),
            image: item.image.clone(),
            size: item.size.clone(),
            color: item.color.clone(),
            quantity: item.quantity,
            price: bazaar_core::Price::usd(item.price).display(),
            line_price: item.line_total().display(),
        }
    }
}

/// Order display data for templates.
#[derive(Clone, Debug)]
pub struct OrderView {
    pub id: String,
    pub short_id: String,
    pub placed_on: String,
    pub status: String,
    pub total: String,
    pub is_paid: bool,
    pub is_delivered: bool,
    pub item_count: u32,
    pub shipping: String,
    pub payment_method: String,
    pub items: Vec<OrderItemView>,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            short_id: order.short_id().to_string(),
            placed_on: order
                .created_at
                .map(|at| at.format("%b %-d, %Y").to_string())
                .unwrap_or_default(),
            status: order.status.to_string(),
            total: order.total().display(),
            is_paid: order.is_paid,
            is_delivered: order.is_delivered,
            item_count: order.item_count(),
            shipping: order.shipping_address.one_line(),
            payment_method: order.payment_method.clone(),
            items: order.order_items.iter().map(OrderItemView::from).collect(),
        }
    }
}

/// Account overview page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/index.html")]
pub struct AccountIndexTemplate {
    pub page: PageContext,
    pub user: UserView,
    pub orders: Vec<OrderView>,
    pub error: Option<String>,
}

/// Order detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/order.html")]
pub struct OrderDetailTemplate {
    pub page: PageContext,
    pub order: OrderView,
}

/// Profile and order history.
#[instrument(skip_all, fields(user_id = %current.user.id))]
pub async fn index(
    State(state): State<AppState>,
    session: ShopperSession,
    page: PageContext,
    RequireAuth(current): RequireAuth,
) -> Result<AccountIndexTemplate> {
    let mut orders = session.load::<OrdersState>().await?;
    orders.begin();

    match state.api().my_orders(&current.token).await {
        Ok(list) => orders.listed(list),
        Err(e) => {
            tracing::warn!("Failed to fetch orders: {e}");
            orders.reject(e.user_message(messages::FETCH_MY_ORDERS_FAILED));
        }
    }
    session.save(&orders).await?;

    Ok(AccountIndexTemplate {
        page,
        user: UserView {
            name: current.user.name,
            email: current.user.email.to_string(),
        },
        orders: orders.data.orders.iter().map(OrderView::from).collect(),
        error: orders.error,
    })
}

/// Load one of the shopper's orders into the orders namespace.
///
/// # Errors
///
/// Returns `NotFound` for an unknown order and passes other backend failures
/// through.
pub async fn load_order_details(
    state: &AppState,
    session: &ShopperSession,
    token: &bazaar_core::store::BearerToken,
    id: &OrderId,
) -> Result<Order> {
    let mut orders = session.load::<OrdersState>().await?;
    if let Some(cached) = orders.data.details.as_ref().filter(|order| &order.id == id) {
        return Ok(cached.clone());
    }

    orders.begin();
    let result = state.api().get_order(token, id).await;
    let outcome = match result {
        Ok(order) => {
            orders.details(order.clone());
            Ok(order)
        }
        Err(e) => {
            orders.reject(e.user_message(messages::FETCH_ORDER_FAILED));
            Err(AppError::not_found_or(e, format!("order {id}")))
        }
    };
    session.save(&orders).await?;
    outcome
}

/// Order detail.
#[instrument(skip_all, fields(user_id = %current.user.id, order_id = %id))]
pub async fn order(
    State(state): State<AppState>,
    session: ShopperSession,
    page: PageContext,
    RequireAuth(current): RequireAuth,
    Path(id): Path<String>,
) -> Result<OrderDetailTemplate> {
    let order = load_order_details(&state, &session, &current.token, &OrderId::new(id)).await?;
    Ok(OrderDetailTemplate {
        page,
        order: OrderView::from(&order),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_view_summarizes_order() {
        let order: Order = serde_json::from_value(serde_json::json!({
            "_id": "65f1c0ffee0123456789abcd",
            "orderItems": [
                {"productId": "p1", "name": "Tee", "price": 10.0, "quantity": 2},
                {"productId": "p2", "name": "Cap", "price": 5.5, "quantity": 1}
            ],
            "shippingAddress": {"address": "1 Main St", "city": "Springfield"},
            "totalPrice": 25.5,
            "status": "Shipped",
            "createdAt": "2024-03-05T10:00:00Z"
        }))
        .unwrap();

        let view = OrderView::from(&order);
        assert_eq!(view.short_id, "6789abcd");
        assert_eq!(view.item_count, 3);
        assert_eq!(view.total, "$25.50");
        assert_eq!(view.status, "Shipped");
        assert_eq!(view.placed_on, "Mar 5, 2024");
        assert_eq!(view.shipping, "1 Main St, Springfield");
    }
}
