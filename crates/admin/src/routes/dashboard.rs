//! Dashboard route handlers.
//!
//! Totals come from the full order and product listings; the metrics
//! fragment re-fetches both and is polled by the page every 10 seconds.

use askama::Template;
use axum::{extract::State, response::Html};
use bazaar_core::messages;
use bazaar_core::models::Order;
use bazaar_core::store::{AdminOrdersState, AdminProductsState};
use bazaar_core::toast::Toast;
use tracing::instrument;

use super::AdminUserView;
use crate::error::Result;
use crate::middleware::RequireAdminAuth;
use crate::models::{AdminSession, CurrentAdmin};
use crate::state::AppState;

/// Number of orders shown in the recent list.
const RECENT_ORDERS: usize = 10;

/// Dashboard metrics.
#[derive(Debug, Clone)]
pub struct DashboardMetrics {
    pub revenue: String,
    pub orders: usize,
    pub products: usize,
    pub error: Option<String>,
}

/// Recent order view for dashboard.
#[derive(Debug, Clone)]
pub struct RecentOrderView {
    pub id: String,
    pub short_id: String,
    pub customer_name: String,
    pub total: String,
    pub status: String,
}

impl From<&Order> for RecentOrderView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            short_id: order.short_id().to_string(),
            customer_name: order
                .user
                .as_ref()
                .map_or_else(|| "Guest".to_string(), bazaar_core::models::UserRef::label),
            total: order.total().display(),
            status: order.status.to_string(),
        }
    }
}

/// Metrics fragment; also embedded in the dashboard page.
#[derive(Template)]
#[template(path = "partials/metrics.html")]
pub struct MetricsTemplate {
    pub metrics: DashboardMetrics,
    pub recent_orders: Vec<RecentOrderView>,
}

/// Dashboard template.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub toast: Option<Toast>,
    pub metrics: DashboardMetrics,
    pub recent_orders: Vec<RecentOrderView>,
}

/// Fetch orders and products in parallel and fold them into the session.
async fn refresh(
    state: &AppState,
    session: &AdminSession,
    admin: &CurrentAdmin,
) -> Result<MetricsTemplate> {
    let mut orders = session.load::<AdminOrdersState>().await?;
    let mut products = session.load::<AdminProductsState>().await?;
    orders.begin();
    products.begin();

    let (orders_result, products_result) = tokio::join!(
        state.api().list_all_orders(&admin.token),
        state.api().list_admin_products(&admin.token),
    );

    match orders_result {
        Ok(list) => orders.listed(list),
        Err(e) => {
            tracing::error!("Failed to fetch orders: {e}");
            orders.reject(e.user_message(messages::FETCH_ORDERS_FAILED));
        }
    }
    match products_result {
        Ok(list) => products.listed(list),
        Err(e) => {
            tracing::error!("Failed to fetch products: {e}");
            products.reject(e.user_message(messages::FETCH_PRODUCTS_FAILED));
        }
    }

    session.save(&orders).await?;
    session.save(&products).await?;

    Ok(MetricsTemplate {
        metrics: DashboardMetrics {
            revenue: orders.total_sales().display(),
            orders: orders.data.total_orders,
            products: products.data.products.len(),
            error: orders.error.clone().or_else(|| products.error.clone()),
        },
        recent_orders: orders
            .data
            .orders
            .iter()
            .take(RECENT_ORDERS)
            .map(RecentOrderView::from)
            .collect(),
    })
}

/// Dashboard page handler.
#[instrument(skip_all, fields(admin_id = %admin.user.id))]
pub async fn dashboard(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: AdminSession,
) -> Result<Html<String>> {
    let MetricsTemplate {
        metrics,
        recent_orders,
    } = refresh(&state, &session, &admin).await?;

    let template = DashboardTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: "/".to_string(),
        toast: session.take_flash().await?,
        metrics,
        recent_orders,
    };
    Ok(Html(template.render()?))
}

/// GET /dashboard/metrics
#[instrument(skip_all)]
pub async fn metrics(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: AdminSession,
) -> Result<Html<String>> {
    let template = refresh(&state, &session, &admin).await?;
    Ok(Html(template.render()?))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_order_prefers_customer_name() {
        let order: Order = serde_json::from_value(serde_json::json!({
            "_id": "665f00aa11bb22cc",
            "user": {"_id": "u1", "name": "Grace"},
            "orderItems": [],
            "totalPrice": 42.5,
            "status": "Shipped"
        }))
        .unwrap();
        let view = RecentOrderView::from(&order);
        assert_eq!(view.customer_name, "Grace");
        assert_eq!(view.total, "$42.50");
        assert_eq!(view.status, "Shipped");
        assert_eq!(view.short_id, "11bb22cc");
    }

    #[test]
    fn test_order_without_user_is_guest() {
        let order: Order =
            serde_json::from_value(serde_json::json!({"_id": "o1", "totalPrice": 1})).unwrap();
        assert_eq!(RecentOrderView::from(&order).customer_name, "Guest");
    }
}
