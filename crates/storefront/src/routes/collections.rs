//! Department collection pages with sidebar facets.
//!
//! The backend is asked for the department's products once; facet
//! filtering happens here so every checkbox change is a cheap HTMX swap of
//! the grid.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, RawQuery, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use bazaar_core::catalog::{Department, FacetSelection, ProductFilters, facets};
use bazaar_core::messages;
use bazaar_core::store::ProductsState;
use tracing::instrument;

use super::products::{ProductCard, ProductGridTemplate, cards};
use super::{PageContext, is_htmx};
use crate::error::{AppError, Result};
use crate::models::ShopperSession;
use crate::state::AppState;

/// One checkbox in a facet group.
#[derive(Clone, Debug)]
pub struct FacetOption {
    pub value: &'static str,
    pub checked: bool,
}

/// A named group of checkboxes sharing a query key.
#[derive(Clone, Debug)]
pub struct FacetGroup {
    pub label: &'static str,
    pub key: &'static str,
    pub options: Vec<FacetOption>,
}

impl FacetGroup {
    fn new(
        label: &'static str,
        key: &'static str,
        values: &[&'static str],
        selection: &FacetSelection,
    ) -> Self {
        Self {
            label,
            key,
            options: values
                .iter()
                .map(|&value| FacetOption {
                    value,
                    checked: selection.is_selected(key, value),
                })
                .collect(),
        }
    }
}

/// The sidebar groups. Gender is fixed by the department.
fn facet_groups(selection: &FacetSelection) -> Vec<FacetGroup> {
    vec![
        FacetGroup::new("Category", "category", &facets::CATEGORIES, selection),
        FacetGroup::new("Color", "color", &facets::COLORS, selection),
        FacetGroup::new("Size", "size", &facets::SIZES, selection),
        FacetGroup::new("Material", "material", &facets::MATERIALS, selection),
        FacetGroup::new("Brand", "brand", &facets::BRANDS, selection),
    ]
}

/// Collection page template.
#[derive(Template, WebTemplate)]
#[template(path = "collections/show.html")]
pub struct CollectionShowTemplate {
    pub page: PageContext,
    pub title: &'static str,
    pub slug: &'static str,
    pub groups: Vec<FacetGroup>,
    pub min_price: String,
    pub max_price: String,
    pub products: Vec<ProductCard>,
    pub error: Option<String>,
}

/// Parse facet selections from the raw query string.
#[must_use]
pub fn selection_from_query(query: Option<&str>) -> FacetSelection {
    query.map_or_else(FacetSelection::default, |raw| {
        FacetSelection::from_pairs(url::form_urlencoded::parse(raw.as_bytes()))
    })
}

/// Display a department with facet filtering.
#[instrument(skip(state, session, page, headers, query))]
pub async fn show(
    State(state): State<AppState>,
    session: ShopperSession,
    page: PageContext,
    headers: HeaderMap,
    Path(department): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Response> {
    let department = Department::from_slug(&department)
        .ok_or_else(|| AppError::NotFound(format!("collection {department}")))?;
    let selection = selection_from_query(query.as_deref());

    let mut products = session.load::<ProductsState>().await?;
    products.clear_filters();
    products.set_filter(ProductFilters::gender(department.gender()));
    products.begin();

    match state.api().list_products(&products.data.filters).await {
        Ok(list) => products.listed(list),
        Err(e) => {
            tracing::warn!("Failed to load {} collection: {e}", department.slug());
            products.reject(e.user_message(messages::LOAD_PRODUCTS_FAILED));
        }
    }
    session.save(&products).await?;

    let grid = cards(selection.apply(&products.data.products));
    let error = products.error.clone();

    if is_htmx(&headers) {
        return Ok(ProductGridTemplate {
            products: grid,
            error,
        }
        .into_response());
    }

    Ok(CollectionShowTemplate {
        page,
        title: department.title(),
        slug: department.slug(),
        groups: facet_groups(&selection),
        min_price: selection.min_price.map(|p| p.to_string()).unwrap_or_default(),
        max_price: selection.max_price.map(|p| p.to_string()).unwrap_or_default(),
        products: grid,
        error,
    }
    .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_reads_repeated_and_comma_values() {
        let selection =
            selection_from_query(Some("color=Red&color=Blue&size=M,L&maxPrice=50"));
        assert_eq!(selection.colors, ["Red", "Blue"]);
        assert_eq!(selection.sizes, ["M", "L"]);
        assert_eq!(selection.max_price, Some(50.into()));
    }

    #[test]
    fn test_groups_mark_checked_options() {
        let selection = selection_from_query(Some("material=Cotton"));
        let groups = facet_groups(&selection);
        let material = groups.iter().find(|g| g.key == "material");
        assert!(material.is_some_and(|g| {
            g.options
                .iter()
                .any(|o| o.value == "Cotton" && o.checked)
        }));
    }
}
