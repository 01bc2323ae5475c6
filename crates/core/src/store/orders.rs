use serde::{Deserialize, Serialize};

use crate::models::Order;

use super::{Namespace, Slice};

/// The shopper's own orders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrdersData {
    pub orders: Vec<Order>,
    pub total_orders: usize,
    pub details: Option<Order>,
}

pub type OrdersState = Slice<OrdersData>;

impl Namespace for OrdersState {
    const KEY: &'static str = "orders";
}

impl OrdersState {
    pub fn listed(&mut self, orders: Vec<Order>) {
        self.data.total_orders = orders.len();
        self.data.orders = orders;
        self.settle();
    }

    pub fn details(&mut self, order: Order) {
        self.data.details = Some(order);
        self.settle();
    }
}
