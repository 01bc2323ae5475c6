//! Live search handler.
//!
//! The header search box sends `hx-get="/search"` with
//! `hx-trigger="keyup changed delay:500ms"`, so a request is only made once
//! typing pauses and stale requests are dropped client-side.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use bazaar_core::catalog::ProductFilters;
use bazaar_core::messages;
use serde::Deserialize;
use tracing::instrument;

use super::products::{ProductCard, cards};
use crate::state::AppState;

/// Results shown in the dropdown.
const SEARCH_LIMIT: u32 = 8;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Search results fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/search_results.html")]
pub struct SearchResultsTemplate {
    pub query: String,
    pub results: Vec<ProductCard>,
    pub error: Option<String>,
}

/// Search products by free text.
///
/// A blank query clears the dropdown without calling the backend.
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> SearchResultsTemplate {
    let term = query.q.trim().to_string();
    if term.is_empty() {
        return SearchResultsTemplate {
            query: term,
            results: Vec::new(),
            error: None,
        };
    }

    let filters = ProductFilters::search(term.clone()).with_limit(SEARCH_LIMIT);
    match state.api().list_products(&filters).await {
        Ok(products) => SearchResultsTemplate {
            query: term,
            results: cards(&products),
            error: None,
        },
        Err(e) => {
            tracing::warn!("Search failed: {e}");
            SearchResultsTemplate {
                query: term,
                results: Vec::new(),
                error: Some(e.user_message(messages::FETCH_PRODUCTS_FAILED)),
            }
        }
    }
}
