use serde::{Deserialize, Serialize};

use crate::catalog::ProductFilters;
use crate::models::Product;

use super::{Namespace, Slice};

/// Catalog browsing state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductsData {
    pub products: Vec<Product>,
    pub selected: Option<Product>,
    pub similar: Vec<Product>,
    pub filters: ProductFilters,
}

pub type ProductsState = Slice<ProductsData>;

impl Namespace for ProductsState {
    const KEY: &'static str = "products";
}

impl ProductsState {
    pub fn listed(&mut self, products: Vec<Product>) {
        self.data.products = products;
        self.settle();
    }

    pub fn selected(&mut self, product: Product) {
        self.data.selected = Some(product);
        self.settle();
    }

    pub fn similar(&mut self, products: Vec<Product>) {
        self.data.similar = products;
        self.settle();
    }

    /// Merge the set fields of `filters` into the active filters.
    pub fn set_filter(&mut self, filters: ProductFilters) {
        self.data.filters.merge(filters);
    }

    pub fn clear_filters(&mut self) {
        self.data.filters = ProductFilters::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_filter_merges_and_clear_resets() {
        let mut state = ProductsState::default();
        state.set_filter(ProductFilters {
            gender: Some("Men".into()),
            ..ProductFilters::default()
        });
        state.set_filter(ProductFilters {
            color: Some("Blue".into()),
            ..ProductFilters::default()
        });

        assert_eq!(state.data.filters.gender.as_deref(), Some("Men"));
        assert_eq!(state.data.filters.color.as_deref(), Some("Blue"));

        state.clear_filters();
        assert_eq!(state.data.filters, ProductFilters::default());
    }
}
