//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use bazaar_core::catalog::{Department, ProductFilters};
use tracing::instrument;

use super::PageContext;
use super::products::{ProductCard, cards};
use crate::state::AppState;

/// How many products the new-arrivals strip shows.
const NEW_ARRIVALS_LIMIT: u32 = 8;

/// A department tile linking to its collection page.
#[derive(Clone, Debug)]
pub struct DepartmentTile {
    pub title: &'static str,
    pub href: String,
}

impl From<Department> for DepartmentTile {
    fn from(department: Department) -> Self {
        Self {
            title: department.title(),
            href: format!("/collections/{}", department.slug()),
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub page: PageContext,
    pub departments: Vec<DepartmentTile>,
    pub featured: Vec<ProductCard>,
    pub new_arrivals: Vec<ProductCard>,
}

/// Display the home page.
///
/// Either product strip is simply left out when its request fails.
#[instrument(skip(state, page))]
pub async fn home(State(state): State<AppState>, page: PageContext) -> HomeTemplate {
    let arrivals_filter = ProductFilters {
        sort_by: Some("newest".to_string()),
        ..ProductFilters::default()
    }
    .with_limit(NEW_ARRIVALS_LIMIT);

    let (featured, new_arrivals) = tokio::join!(
        state.api().featured_products(),
        state.api().list_products(&arrivals_filter),
    );

    let featured = featured.unwrap_or_else(|e| {
        tracing::warn!("Failed to load featured products: {e}");
        Vec::new()
    });
    let new_arrivals = new_arrivals.unwrap_or_else(|e| {
        tracing::warn!("Failed to load new arrivals: {e}");
        Vec::new()
    });

    HomeTemplate {
        page,
        departments: Department::ALL.into_iter().map(DepartmentTile::from).collect(),
        featured: cards(&featured),
        new_arrivals: cards(&new_arrivals),
    }
}
