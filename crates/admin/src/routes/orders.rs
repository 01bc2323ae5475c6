//! Order management route handlers.

use askama::Template;
use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use bazaar_core::OrderStatus;
use bazaar_core::messages;
use bazaar_core::models::Order;
use bazaar_core::store::AdminOrdersState;
use bazaar_core::toast::Toast;
use bazaar_core::types::OrderId;
use serde::Deserialize;
use tracing::instrument;

use super::{AdminUserView, toast_trigger};
use crate::error::Result;
use crate::middleware::RequireAdminAuth;
use crate::models::AdminSession;
use crate::state::AppState;

/// Order row view for templates.
#[derive(Debug, Clone)]
pub struct OrderRow {
    pub id: String,
    pub short_id: String,
    pub customer: String,
    pub total: String,
    pub status: String,
    pub is_paid: bool,
    pub created_at: String,
    pub statuses: Vec<StatusOption>,
}

/// One entry of the status dropdown.
#[derive(Debug, Clone, Copy)]
pub struct StatusOption {
    pub label: &'static str,
    pub selected: bool,
}

impl From<&Order> for OrderRow {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            short_id: order.short_id().to_string(),
            customer: order
                .user
                .as_ref()
                .map_or_else(|| "Guest".to_string(), bazaar_core::models::UserRef::label),
            total: order.total().display(),
            status: order.status.to_string(),
            is_paid: order.is_paid,
            created_at: order
                .created_at
                .map(|at| at.format("%b %d, %Y").to_string())
                .unwrap_or_default(),
            statuses: OrderStatus::ALL
                .into_iter()
                .map(|status| StatusOption {
                    label: status.as_str(),
                    selected: status == order.status,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
}

/// Orders list page template.
#[derive(Template)]
#[template(path = "orders/index.html")]
pub struct OrdersIndexTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub toast: Option<Toast>,
    pub orders: Vec<OrderRow>,
    pub total_sales: String,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "orders/row.html")]
pub struct OrderRowTemplate {
    pub order: OrderRow,
}

fn failed(status: StatusCode, message: String) -> Response {
    (status, toast_trigger(&Toast::error(message))).into_response()
}

/// Orders list page handler.
#[instrument(skip_all)]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: AdminSession,
) -> Result<Html<String>> {
    let mut orders = session.load::<AdminOrdersState>().await?;
    orders.begin();
    match state.api().list_all_orders(&admin.token).await {
        Ok(list) => orders.listed(list),
        Err(e) => {
            tracing::error!("Failed to fetch orders: {e}");
            orders.reject(e.user_message(messages::FETCH_ORDERS_FAILED));
        }
    }
    session.save(&orders).await?;

    let template = OrdersIndexTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: "/orders".to_string(),
        toast: session.take_flash().await?,
        orders: orders.data.orders.iter().map(OrderRow::from).collect(),
        total_sales: orders.total_sales().display(),
        error: orders.error,
    };
    Ok(Html(template.render()?))
}

/// POST /orders/{id}/status
///
/// Answers with the updated row only.
#[instrument(skip(admin, state, session))]
pub async fn update_status(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<String>,
    Form(form): Form<StatusForm>,
) -> Result<Response> {
    let status: OrderStatus = match form.status.parse() {
        Ok(status) => status,
        Err(message) => return Ok(failed(StatusCode::BAD_REQUEST, message)),
    };

    let id = OrderId::new(id);
    let mut orders = session.load::<AdminOrdersState>().await?;
    match state
        .api()
        .update_order_status(&admin.token, &id, status)
        .await
    {
        Ok(order) => {
            tracing::info!(order_id = %order.id, %status, "Order status changed");
            let row = OrderRowTemplate {
                order: OrderRow::from(&order),
            };
            orders.updated(order);
            session.save(&orders).await?;
            Ok((
                toast_trigger(&Toast::success(format!("Order marked {status}"))),
                Html(row.render()?),
            )
                .into_response())
        }
        Err(e) => {
            tracing::warn!("Failed to update order: {e}");
            let message = e.user_message(messages::UPDATE_ORDER_FAILED);
            orders.reject(message.clone());
            session.save(&orders).await?;
            Ok(failed(StatusCode::BAD_GATEWAY, message))
        }
    }
}

/// POST /orders/{id}/delete
#[instrument(skip(admin, state, session))]
pub async fn delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<String>,
) -> Result<Response> {
    let id = OrderId::new(id);
    let mut orders = session.load::<AdminOrdersState>().await?;

    match state.api().delete_order(&admin.token, &id).await {
        Ok(()) => {
            orders.deleted(&id);
            session.save(&orders).await?;
            Ok((
                toast_trigger(&Toast::success("Order deleted")),
                Html(String::new()),
            )
                .into_response())
        }
        Err(e) => {
            tracing::warn!("Failed to delete order: {e}");
            let message = e.user_message(messages::DELETE_ORDER_FAILED);
            orders.reject(message.clone());
            session.save(&orders).await?;
            Ok(failed(StatusCode::BAD_GATEWAY, message))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_row_selects_current_status() {
        let order: Order = serde_json::from_value(serde_json::json!({
            "_id": "o1",
            "totalPrice": 30,
            "isPaid": true,
            "status": "Delivered",
            "createdAt": "2024-03-05T10:00:00Z"
        }))
        .unwrap();
        let row = OrderRow::from(&order);

        let selected: Vec<_> = row
            .statuses
            .iter()
            .filter(|option| option.selected)
            .map(|option| option.label)
            .collect();
        assert_eq!(selected, ["Delivered"]);
        assert_eq!(row.statuses.len(), 4);
        assert_eq!(row.created_at, "Mar 05, 2024");
        assert_eq!(row.customer, "Guest");
        assert!(row.is_paid);
    }

    #[test]
    fn test_row_template_renders_select() {
        let order: Order =
            serde_json::from_value(serde_json::json!({"_id": "o9", "totalPrice": 5})).unwrap();
        let html = OrderRowTemplate {
            order: OrderRow::from(&order),
        }
        .render()
        .unwrap();
        assert!(html.contains(r#"id="order-o9""#));
        assert!(html.contains(r#"hx-post="/orders/o9/status""#));
        assert!(html.contains(r#"<option value="Processing" selected>"#));
    }
}
