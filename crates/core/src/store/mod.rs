//! Per-session state container.
//!
//! Every concern (auth, cart, checkout, products, orders and the three admin
//! collections) owns one namespace shaped `{data, loading, error}`. The
//! binaries load a namespace from the session, run one backend call between
//! [`Slice::begin`] and [`Slice::resolve`]/[`Slice::reject`], and write it
//! back. Reducer methods on each namespace are the only way data changes.

mod admin;
mod auth;
mod cart;
mod checkout;
mod orders;
mod products;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub use admin::{
    AdminOrdersData, AdminOrdersState, AdminProductsData, AdminProductsState, AdminUsersData,
    AdminUsersState,
};
pub use auth::{AuthData, AuthState, BearerToken};
pub use cart::CartState;
pub use checkout::CheckoutState;
pub use orders::{OrdersData, OrdersState};
pub use products::{ProductsData, ProductsState};

use crate::models::{Order, Product, User};
use crate::types::{OrderId, ProductId, UserId};

/// One namespace: its data plus request bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Slice<T> {
    pub data: T,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Slice<T> {
    /// Mark a request as in flight and clear the previous error.
    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Replace the data with a successful response.
    pub fn resolve(&mut self, data: T) {
        self.data = data;
        self.settle();
    }

    /// Record a failure. The data is left as it was.
    pub fn reject(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
    }

    /// Finish a request whose reducer already updated `data` in place.
    pub fn settle(&mut self) {
        self.loading = false;
        self.error = None;
    }
}

/// A namespace persisted under a fixed session key.
pub trait Namespace: Serialize + DeserializeOwned + Default + Send + Sync {
    /// Session key the namespace is stored under.
    const KEY: &'static str;
}

/// A record the backend identifies by `_id`.
pub trait Identified {
    type Id: PartialEq;

    fn id(&self) -> &Self::Id;
}

impl Identified for User {
    type Id = UserId;

    fn id(&self) -> &UserId {
        &self.id
    }
}

impl Identified for Product {
    type Id = ProductId;

    fn id(&self) -> &ProductId {
        &self.id
    }
}

impl Identified for Order {
    type Id = OrderId;

    fn id(&self) -> &OrderId {
        &self.id
    }
}

/// Replace the record with the same id in place, or append it.
pub fn upsert_by_id<T: Identified>(items: &mut Vec<T>, item: T) {
    match items.iter_mut().find(|existing| existing.id() == item.id()) {
        Some(existing) => *existing = item,
        None => items.push(item),
    }
}

/// Replace the record with the same id in place. Returns `false` (and
/// changes nothing) when no record matches.
pub fn replace_by_id<T: Identified>(items: &mut [T], item: T) -> bool {
    items
        .iter_mut()
        .find(|existing| existing.id() == item.id())
        .map(|existing| *existing = item)
        .is_some()
}

/// Remove the first record with the given id. Returns whether a record was
/// removed.
pub fn remove_by_id<T: Identified>(items: &mut Vec<T>, id: &T::Id) -> bool {
    items
        .iter()
        .position(|item| item.id() == id)
        .map(|index| items.remove(index))
        .is_some()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{Email, Role};

    fn user(id: &str, name: &str) -> User {
        User {
            id: UserId::new(id),
            name: name.to_string(),
            email: Email::parse(&format!("{id}@example.com")).unwrap(),
            role: Role::Customer,
        }
    }

    #[test]
    fn test_reject_keeps_data() {
        let mut slice = Slice {
            data: vec![1, 2, 3],
            ..Slice::default()
        };
        slice.begin();
        assert!(slice.loading);

        slice.reject("Failed to fetch");
        assert!(!slice.loading);
        assert_eq!(slice.error.as_deref(), Some("Failed to fetch"));
        assert_eq!(slice.data, vec![1, 2, 3]);

        slice.begin();
        assert!(slice.error.is_none());
        slice.resolve(vec![4]);
        assert_eq!(slice.data, vec![4]);
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut users = vec![user("a", "Ann"), user("b", "Ben")];
        upsert_by_id(&mut users, user("a", "Annie"));
        upsert_by_id(&mut users, user("c", "Cy"));

        let names: Vec<_> = users.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, ["Annie", "Ben", "Cy"]);
    }

    #[test]
    fn test_replace_ignores_unknown_ids() {
        let mut users = vec![user("a", "Ann")];
        assert!(!replace_by_id(&mut users, user("z", "Zed")));
        assert_eq!(users.len(), 1);
    }

    #[test]
    fn test_remove_takes_exactly_one_row() {
        let mut users = vec![user("a", "Ann"), user("b", "Ben"), user("c", "Cy")];
        assert!(remove_by_id(&mut users, &UserId::new("b")));
        assert_eq!(users.len(), 2);
        assert!(!remove_by_id(&mut users, &UserId::new("b")));
        assert_eq!(users.len(), 2);
    }
}
