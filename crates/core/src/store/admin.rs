use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Order, Product, User};
use crate::types::{OrderId, Price, ProductId, UserId};

use super::{Namespace, Slice, remove_by_id, replace_by_id, upsert_by_id};

// -----------------------------------------------------------------------------
// Users
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUsersData {
    pub users: Vec<User>,
}

pub type AdminUsersState = Slice<AdminUsersData>;

impl Namespace for AdminUsersState {
    const KEY: &'static str = "admin_users";
}

impl AdminUsersState {
    pub fn listed(&mut self, users: Vec<User>) {
        self.resolve(AdminUsersData { users });
    }

    /// A user the backend just created. A repeated submission that comes
    /// back with an id already listed replaces that row.
    pub fn added(&mut self, user: User) {
        upsert_by_id(&mut self.data.users, user);
        self.settle();
    }

    pub fn updated(&mut self, user: User) {
        replace_by_id(&mut self.data.users, user);
        self.settle();
    }

    pub fn deleted(&mut self, id: &UserId) {
        remove_by_id(&mut self.data.users, id);
        self.settle();
    }
}

// -----------------------------------------------------------------------------
// Products
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminProductsData {
    pub products: Vec<Product>,
}

pub type AdminProductsState = Slice<AdminProductsData>;

impl Namespace for AdminProductsState {
    const KEY: &'static str = "admin_products";
}

impl AdminProductsState {
    pub fn listed(&mut self, products: Vec<Product>) {
        self.resolve(AdminProductsData { products });
    }

    pub fn created(&mut self, product: Product) {
        upsert_by_id(&mut self.data.products, product);
        self.settle();
    }

    pub fn updated(&mut self, product: Product) {
        replace_by_id(&mut self.data.products, product);
        self.settle();
    }

    pub fn deleted(&mut self, id: &ProductId) {
        remove_by_id(&mut self.data.products, id);
        self.settle();
    }

    #[must_use]
    pub fn find(&self, id: &ProductId) -> Option<&Product> {
        self.data.products.iter().find(|product| &product.id == id)
    }
}

// -----------------------------------------------------------------------------
// Orders
// -----------------------------------------------------------------------------

/// All orders plus the dashboard totals derived from them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminOrdersData {
    pub orders: Vec<Order>,
    pub total_orders: usize,
    pub total_sales: Decimal,
}

pub type AdminOrdersState = Slice<AdminOrdersData>;

impl Namespace for AdminOrdersState {
    const KEY: &'static str = "admin_orders";
}

impl AdminOrdersState {
    pub fn listed(&mut self, orders: Vec<Order>) {
        self.data.orders = orders;
        self.recompute_totals();
        self.settle();
    }

    pub fn updated(&mut self, order: Order) {
        if replace_by_id(&mut self.data.orders, order) {
            self.recompute_totals();
        }
        self.settle();
    }

    pub fn deleted(&mut self, id: &OrderId) {
        if remove_by_id(&mut self.data.orders, id) {
            self.recompute_totals();
        }
        self.settle();
    }

    #[must_use]
    pub const fn total_sales(&self) -> Price {
        Price::usd(self.data.total_sales)
    }

    fn recompute_totals(&mut self) {
        self.data.total_orders = self.data.orders.len();
        self.data.total_sales = self.data.orders.iter().map(|order| order.total_price).sum();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::OrderStatus;

    fn order(id: &str, cents: i32) -> Order {
        serde_json::from_value(serde_json::json!({
            "_id": id,
            "orderItems": [],
            "totalPrice": f64::from(cents) / 100.0,
        }))
        .unwrap()
    }

    fn product(id: &str) -> Product {
        serde_json::from_value(serde_json::json!({"_id": id, "name": id, "price": 10}))
            .unwrap()
    }

    #[test]
    fn test_added_user_is_listed_once() {
        let user = |name: &str| -> User {
            serde_json::from_value(serde_json::json!({
                "_id": "u9", "name": name, "email": "new@example.com", "role": "customer"
            }))
            .unwrap()
        };
        let mut state = AdminUsersState::default();
        state.begin();
        state.added(user("New"));
        state.added(user("Renamed"));

        assert!(!state.loading);
        assert_eq!(state.data.users.len(), 1);
        assert_eq!(state.data.users.first().unwrap().name, "Renamed");
    }

    #[test]
    fn test_created_product_appends_new_ids() {
        let mut state = AdminProductsState::default();
        state.listed(vec![product("p1")]);
        state.created(product("p2"));
        state.created(product("p2"));

        let ids: Vec<_> = state.data.products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["p1", "p2"]);
    }

    #[test]
    fn test_listing_orders_computes_totals() {
        let mut state = AdminOrdersState::default();
        state.listed(vec![order("o1", 1000), order("o2", 2550)]);

        assert_eq!(state.data.total_orders, 2);
        assert_eq!(state.total_sales().display(), "$35.50");
    }

    #[test]
    fn test_status_update_touches_only_that_row() {
        let mut state = AdminOrdersState::default();
        state.listed(vec![order("o1", 1000), order("o2", 2000), order("o3", 3000)]);
        let before = state.data.orders.clone();

        let mut shipped = before.get(1).unwrap().clone();
        shipped.status = OrderStatus::Shipped;
        state.updated(shipped);

        for (index, (old, new)) in before.iter().zip(&state.data.orders).enumerate() {
            if index == 1 {
                assert_eq!(new.status, OrderStatus::Shipped);
                assert_eq!(new.id, old.id);
            } else {
                assert_eq!(old, new);
            }
        }
    }

    #[test]
    fn test_deleting_order_updates_totals() {
        let mut state = AdminOrdersState::default();
        state.listed(vec![order("o1", 1000), order("o2", 2000)]);
        state.deleted(&OrderId::new("o1"));

        assert_eq!(state.data.total_orders, 1);
        assert_eq!(state.total_sales().display(), "$20.00");
    }

    #[test]
    fn test_deleting_product_removes_exactly_one_row() {
        let mut state = AdminProductsState::default();
        state.listed(vec![product("a"), product("b"), product("c")]);

        state.deleted(&ProductId::new("b"));
        let ids: Vec<_> = state.data.products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["a", "c"]);
    }

    #[test]
    fn test_user_reducers_splice_by_id() {
        let mut state = AdminUsersState::default();
        let ada: User = serde_json::from_value(
            serde_json::json!({"_id": "u1", "name": "Ada", "email": "ada@example.com"}),
        )
        .unwrap();
        state.added(ada.clone());

        let mut promoted = ada;
        promoted.role = crate::types::Role::Admin;
        state.updated(promoted);
        assert!(state.data.users.first().unwrap().role.is_admin());

        state.deleted(&UserId::new("u1"));
        assert!(state.data.users.is_empty());
    }
}
