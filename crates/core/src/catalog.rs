//! Catalog queries and facet filtering.
//!
//! [`ProductFilters`] is what the backend's `GET /api/products` understands.
//! [`FacetSelection`] is the multi-select sidebar on department pages, applied
//! locally to the products the backend returned for that department.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Product;

/// Query parameters for `GET /api/products`.
///
/// Values are forwarded as strings; empty values are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
}

impl ProductFilters {
    /// Products in one category.
    #[must_use]
    pub fn category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            ..Self::default()
        }
    }

    /// Products for one gender/department.
    #[must_use]
    pub fn gender(gender: impl Into<String>) -> Self {
        Self {
            gender: Some(gender.into()),
            ..Self::default()
        }
    }

    /// Free-text search.
    #[must_use]
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
            ..Self::default()
        }
    }

    /// Cap the number of results.
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit.to_string());
        self
    }

    /// Overwrite every field that is set (non-empty) in `other`.
    pub fn merge(&mut self, other: Self) {
        fn take(slot: &mut Option<String>, value: Option<String>) {
            if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
                *slot = Some(value);
            }
        }

        take(&mut self.category, other.category);
        take(&mut self.size, other.size);
        take(&mut self.color, other.color);
        take(&mut self.gender, other.gender);
        take(&mut self.brand, other.brand);
        take(&mut self.min_price, other.min_price);
        take(&mut self.max_price, other.max_price);
        take(&mut self.limit, other.limit);
        take(&mut self.sort_by, other.sort_by);
        take(&mut self.search, other.search);
        take(&mut self.material, other.material);
        take(&mut self.collection, other.collection);
    }

    /// Query pairs in backend naming, without empty values.
    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        [
            ("category", &self.category),
            ("size", &self.size),
            ("color", &self.color),
            ("gender", &self.gender),
            ("brand", &self.brand),
            ("minPrice", &self.min_price),
            ("maxPrice", &self.max_price),
            ("limit", &self.limit),
            ("sortBy", &self.sort_by),
            ("search", &self.search),
            ("material", &self.material),
            ("collection", &self.collection),
        ]
        .into_iter()
        .filter_map(|(key, value)| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| (key, v.to_string()))
        })
        .collect()
    }
}

/// Storefront departments, each backed by a gender value in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Department {
    Men,
    Women,
    Kids,
    Beauty,
}

impl Department {
    pub const ALL: [Self; 4] = [Self::Men, Self::Women, Self::Kids, Self::Beauty];

    /// URL segment, e.g. `men`.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Men => "men",
            Self::Women => "women",
            Self::Kids => "kids",
            Self::Beauty => "beauty",
        }
    }

    /// Gender value the backend stores on products.
    #[must_use]
    pub const fn gender(self) -> &'static str {
        match self {
            Self::Men => "Men",
            Self::Women => "Women",
            Self::Kids => "Kids",
            Self::Beauty => "Beauty",
        }
    }

    /// Page heading.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Men => "Men's Collection",
            Self::Women => "Women's Collection",
            Self::Kids => "Kids' Collection",
            Self::Beauty => "Beauty",
        }
    }

    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|department| department.slug().eq_ignore_ascii_case(slug))
    }
}

/// Choices offered in the filter sidebar.
pub mod facets {
    pub const CATEGORIES: [&str; 4] = ["Top Wear", "Bottom Wear", "Footwear", "Accessories"];
    pub const COLORS: [&str; 8] = [
        "Black", "White", "Blue", "Red", "Navy", "Grey", "Pink", "Green",
    ];
    pub const SIZES: [&str; 6] = ["XS", "S", "M", "L", "XL", "XXL"];
    pub const MATERIALS: [&str; 7] = [
        "Cotton",
        "Wool",
        "Denim",
        "Silk",
        "Linen",
        "Polyester",
        "Viscose",
    ];
    pub const BRANDS: [&str; 6] = [
        "Street Style",
        "Bewakoof",
        "Urban Threads",
        "Fastionista",
        "Cantabil",
        "Chicstyle",
    ];
}

/// Multi-select sidebar filters.
///
/// Empty facets match everything; non-empty facets are combined with AND.
/// Within a facet, any selected value matches (colors and sizes match when
/// the product offers at least one selected value).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetSelection {
    pub categories: Vec<String>,
    pub genders: Vec<String>,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
    pub materials: Vec<String>,
    pub brands: Vec<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

impl FacetSelection {
    /// Build from decoded query pairs. Repeated keys select several values;
    /// comma-separated values are split as well.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut selection = Self::default();
        for (key, value) in pairs {
            let value = value.as_ref().trim();
            if value.is_empty() {
                continue;
            }
            let target = match key.as_ref() {
                "category" => &mut selection.categories,
                "gender" => &mut selection.genders,
                "color" => &mut selection.colors,
                "size" => &mut selection.sizes,
                "material" => &mut selection.materials,
                "brand" => &mut selection.brands,
                "minPrice" => {
                    selection.min_price = value.parse().ok();
                    continue;
                }
                "maxPrice" => {
                    selection.max_price = value.parse().ok();
                    continue;
                }
                _ => continue,
            };
            target.extend(
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(String::from),
            );
        }
        selection
    }

    /// Whether the product passes every active facet.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let one_of = |selected: &[String], value: &str| {
            selected.is_empty() || selected.iter().any(|s| s == value)
        };
        let any_of = |selected: &[String], offered: &[String]| {
            selected.is_empty() || offered.iter().any(|o| selected.contains(o))
        };

        one_of(&self.genders, &product.gender)
            && one_of(&self.categories, &product.category)
            && any_of(&self.colors, &product.colors)
            && any_of(&self.sizes, &product.sizes)
            && one_of(&self.materials, &product.material)
            && one_of(&self.brands, &product.brand)
            && self.min_price.is_none_or(|min| product.price >= min)
            && self.max_price.is_none_or(|max| product.price <= max)
    }

    /// Products passing the filters, in their original order.
    #[must_use]
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }

    /// Whether `value` is selected in the named facet (for checkbox state).
    #[must_use]
    pub fn is_selected(&self, facet: &str, value: &str) -> bool {
        let selected = match facet {
            "category" => &self.categories,
            "gender" => &self.genders,
            "color" => &self.colors,
            "size" => &self.sizes,
            "material" => &self.materials,
            "brand" => &self.brands,
            _ => return false,
        };
        selected.iter().any(|s| s == value)
    }
}

/// Same-category products, excluding the product itself.
#[must_use]
pub fn similar_products(product: &Product, candidates: Vec<Product>) -> Vec<Product> {
    candidates
        .into_iter()
        .filter(|candidate| candidate.id != product.id && candidate.category == product.category)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: &str, gender: &str, colors: &[&str], price: i64) -> Product {
        serde_json::from_value(serde_json::json!({
            "_id": id,
            "name": id,
            "price": price,
            "gender": gender,
            "category": "Top Wear",
            "colors": colors,
            "sizes": ["M"],
        }))
        .unwrap()
    }

    #[test]
    fn test_query_drops_empty_values() {
        let filters = ProductFilters {
            gender: Some("Men".into()),
            color: Some("  ".into()),
            sort_by: Some("priceAsc".into()),
            ..ProductFilters::default()
        }
        .with_limit(8);

        assert_eq!(
            filters.to_query(),
            vec![
                ("gender", "Men".to_string()),
                ("limit", "8".to_string()),
                ("sortBy", "priceAsc".to_string()),
            ]
        );
    }

    #[test]
    fn test_merge_keeps_unset_fields() {
        let mut filters = ProductFilters::gender("Women");
        filters.merge(ProductFilters {
            brand: Some("Chicstyle".into()),
            gender: Some(String::new()),
            ..ProductFilters::default()
        });
        assert_eq!(filters.gender.as_deref(), Some("Women"));
        assert_eq!(filters.brand.as_deref(), Some("Chicstyle"));
    }

    #[test]
    fn test_facets_combine_with_and() {
        let products = vec![
            product("a", "Men", &["Red", "Blue"], 20),
            product("b", "Men", &["Black"], 20),
            product("c", "Women", &["Red"], 20),
            product("d", "Men", &["Red"], 500),
        ];

        let selection = FacetSelection::from_pairs([
            ("gender", "Men"),
            ("color", "Red"),
            ("color", "Green"),
            ("maxPrice", "200"),
        ]);
        let ids: Vec<_> = selection
            .apply(&products)
            .into_iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, ["a"]);
    }

    #[test]
    fn test_empty_selection_matches_everything() {
        let products = vec![product("a", "Men", &[], 1), product("b", "Kids", &[], 2)];
        assert_eq!(FacetSelection::default().apply(&products).len(), 2);
    }

    #[test]
    fn test_comma_separated_values_split() {
        let selection = FacetSelection::from_pairs([("size", "S, M,,L")]);
        assert_eq!(selection.sizes, ["S", "M", "L"]);
        assert!(selection.is_selected("size", "M"));
        assert!(!selection.is_selected("size", "XL"));
    }

    #[test]
    fn test_similar_excludes_self_and_other_categories() {
        let base = product("a", "Men", &[], 10);
        let mut other_category = product("c", "Men", &[], 10);
        other_category.category = "Footwear".into();

        let similar = similar_products(
            &base,
            vec![base.clone(), product("b", "Men", &[], 10), other_category],
        );
        assert_eq!(similar.len(), 1);
        assert_eq!(similar.first().unwrap().id.as_str(), "b");
    }

    #[test]
    fn test_department_from_slug() {
        assert_eq!(Department::from_slug("Women"), Some(Department::Women));
        assert_eq!(Department::from_slug("pets"), None);
    }
}
