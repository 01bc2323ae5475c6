//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use bazaar_core::ProductId;
use bazaar_core::catalog::ProductFilters;
use bazaar_core::messages;
use bazaar_core::models::Product;
use bazaar_core::store::ProductsState;
use tracing::instrument;

use super::{PageContext, is_htmx};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::ShopperSession;
use crate::state::AppState;

/// Product card data for grids.
#[derive(Clone, Debug)]
pub struct ProductCard {
    pub id: String,
    pub name: String,
    pub price: String,
    /// List price, shown struck through when a discount applies.
    pub list_price: Option<String>,
    pub image_url: Option<String>,
    pub image_alt: String,
}

impl From<&Product> for ProductCard {
    fn from(product: &Product) -> Self {
        let price = product.effective_price().display();
        let list_price = product.list_price().display();
        let image = product.primary_image();
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            list_price: (list_price != price).then_some(list_price),
            price,
            image_url: image.map(|img| img.url.clone()),
            image_alt: image
                .and_then(|img| img.alt_text.clone())
                .unwrap_or_else(|| product.name.clone()),
        }
    }
}

/// Cards for a product list.
#[must_use]
pub fn cards<'a>(products: impl IntoIterator<Item = &'a Product>) -> Vec<ProductCard> {
    products.into_iter().map(ProductCard::from).collect()
}

/// Image display data for the gallery.
#[derive(Clone, Debug)]
pub struct ImageView {
    pub url: String,
    pub alt: String,
}

/// Product detail data for templates.
#[derive(Clone, Debug)]
pub struct ProductDetail {
    pub card: ProductCard,
    pub description: String,
    pub brand: String,
    pub material: String,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub images: Vec<ImageView>,
    pub in_stock: bool,
}

impl From<&Product> for ProductDetail {
    fn from(product: &Product) -> Self {
        Self {
            card: ProductCard::from(product),
            description: product.description.clone(),
            brand: product.brand.clone(),
            material: product.material.clone(),
            sizes: product.sizes.clone(),
            colors: product.colors.clone(),
            images: product
                .images
                .iter()
                .map(|img| ImageView {
                    url: img.url.clone(),
                    alt: img.alt_text.clone().unwrap_or_else(|| product.name.clone()),
                })
                .collect(),
            in_stock: product.in_stock(),
        }
    }
}

/// Product grid fragment (for HTMX filter and sort changes).
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_grid.html")]
pub struct ProductGridTemplate {
    pub products: Vec<ProductCard>,
    pub error: Option<String>,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub page: PageContext,
    pub products: Vec<ProductCard>,
    pub error: Option<String>,
    pub search: String,
    pub sort_by: String,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub page: PageContext,
    pub product: ProductDetail,
    pub similar: Vec<ProductCard>,
}

/// Display the product listing, filtered by the backend.
#[instrument(skip(state, session, page, headers))]
pub async fn index(
    State(state): State<AppState>,
    session: ShopperSession,
    page: PageContext,
    headers: HeaderMap,
    Query(filters): Query<ProductFilters>,
) -> Result<Response> {
    let mut products = session.load::<ProductsState>().await?;
    products.clear_filters();
    products.set_filter(filters);
    products.begin();

    match state.api().list_products(&products.data.filters).await {
        Ok(list) => products.listed(list),
        Err(e) => {
            tracing::warn!("Failed to list products: {e}");
            products.reject(e.user_message(messages::FETCH_PRODUCTS_FAILED));
        }
    }
    session.save(&products).await?;

    let grid = cards(&products.data.products);
    let error = products.error.clone();

    if is_htmx(&headers) {
        return Ok(ProductGridTemplate {
            products: grid,
            error,
        }
        .into_response());
    }

    let filters = &products.data.filters;
    Ok(ProductsIndexTemplate {
        search: filters.search.clone().unwrap_or_default(),
        sort_by: filters.sort_by.clone().unwrap_or_default(),
        page,
        products: grid,
        error,
    }
    .into_response())
}

/// Display a product with its similar products.
#[instrument(skip(state, session, page))]
pub async fn show(
    State(state): State<AppState>,
    session: ShopperSession,
    page: PageContext,
    Path(id): Path<String>,
) -> Result<Response> {
    let id = ProductId::new(id);
    let mut products = session.load::<ProductsState>().await?;
    products.begin();

    let product = match state.api().get_product(&id).await {
        Ok(product) => product,
        Err(e) => {
            products.reject(e.user_message(messages::FETCH_PRODUCT_FAILED));
            session.save(&products).await?;
            return Err(AppError::not_found_or(e, format!("product {id}")));
        }
    };
    add_breadcrumb("catalog", "Viewed product", Some(&[("product_id", id.as_str())]));

    let similar = state.api().similar_products(&product).await.unwrap_or_else(|e| {
        tracing::warn!("Failed to load similar products for {id}: {e}");
        Vec::new()
    });

    let view = ProductDetail::from(&product);
    let similar_cards = cards(&similar);
    products.selected(product);
    products.similar(similar);
    session.save(&products).await?;

    Ok(ProductShowTemplate {
        page,
        product: view,
        similar: similar_cards,
    }
    .into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(price: f64, discount: Option<f64>) -> Product {
        serde_json::from_value(serde_json::json!({
            "_id": "p1",
            "name": "Linen Shirt",
            "price": price,
            "discountPrice": discount,
            "images": [{"url": "https://img.example/shirt.jpg"}],
        }))
        .unwrap()
    }

    #[test]
    fn test_card_shows_list_price_only_when_discounted() {
        let card = ProductCard::from(&product(40.0, Some(29.5)));
        assert_eq!(card.price, "$29.50");
        assert_eq!(card.list_price.as_deref(), Some("$40.00"));
        assert_eq!(card.image_alt, "Linen Shirt");

        let card = ProductCard::from(&product(40.0, None));
        assert_eq!(card.price, "$40.00");
        assert!(card.list_price.is_none());
    }
}
