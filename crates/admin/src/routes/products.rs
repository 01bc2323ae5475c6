//! Product management route handlers.

use askama::Template;
use axum::{
    Form,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use bazaar_core::messages;
use bazaar_core::models::{Product, ProductImage, ProductInput};
use bazaar_core::store::AdminProductsState;
use bazaar_core::toast::Toast;
use bazaar_core::types::ProductId;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use super::{AdminUserView, toast_trigger};
use crate::api::ImageUpload;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::models::{AdminSession, CurrentAdmin};
use crate::state::AppState;

/// Product row view for templates.
#[derive(Debug, Clone)]
pub struct ProductRow {
    pub id: String,
    pub name: String,
    pub price: String,
    pub category: String,
    pub brand: String,
    pub stock: u32,
    pub sku: String,
}

impl From<&Product> for ProductRow {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            price: product.list_price().display(),
            category: product.category.clone(),
            brand: product.brand.clone(),
            stock: product.count_in_stock,
            sku: product.sku.clone(),
        }
    }
}

/// Product fields as submitted by the create and edit forms.
///
/// Sizes and colors are comma-separated lists.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub discount_price: String,
    #[serde(default)]
    pub count_in_stock: String,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub sizes: String,
    #[serde(default)]
    pub colors: String,
    #[serde(default)]
    pub collections: String,
    #[serde(default)]
    pub material: String,
    #[serde(default)]
    pub gender: String,
}

impl From<&Product> for ProductForm {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.to_string(),
            discount_price: product
                .discount_price
                .map(|price| price.to_string())
                .unwrap_or_default(),
            count_in_stock: product.count_in_stock.to_string(),
            sku: product.sku.clone(),
            category: product.category.clone(),
            brand: product.brand.clone(),
            sizes: product.sizes.join(", "),
            colors: product.colors.join(", "),
            collections: product.collections.clone(),
            material: product.material.clone(),
            gender: product.gender.clone(),
        }
    }
}

impl ProductForm {
    /// Set a field by its form name; unknown names are ignored.
    fn set(&mut self, name: &str, value: String) {
        let slot = match name {
            "name" => &mut self.name,
            "description" => &mut self.description,
            "price" => &mut self.price,
            "discount_price" => &mut self.discount_price,
            "count_in_stock" => &mut self.count_in_stock,
            "sku" => &mut self.sku,
            "category" => &mut self.category,
            "brand" => &mut self.brand,
            "sizes" => &mut self.sizes,
            "colors" => &mut self.colors,
            "collections" => &mut self.collections,
            "material" => &mut self.material,
            "gender" => &mut self.gender,
            _ => return,
        };
        *slot = value;
    }

    /// Build the backend body. Name and price are required; stock defaults
    /// to zero.
    ///
    /// # Errors
    ///
    /// Returns the message to show when a field is missing or malformed.
    pub fn to_input(&self) -> std::result::Result<ProductInput, String> {
        let name = self.name.trim();
        if name.is_empty() || self.price.trim().is_empty() {
            return Err(messages::FILL_ALL_FIELDS.to_string());
        }
        let price = parse_price(&self.price)?;
        let discount_price = match self.discount_price.trim() {
            "" => None,
            raw => Some(parse_price(raw)?),
        };
        let count_in_stock = match self.count_in_stock.trim() {
            "" => 0,
            raw => raw
                .parse()
                .map_err(|_| format!("Invalid stock count: {raw}"))?,
        };

        Ok(ProductInput {
            name: name.to_string(),
            description: self.description.trim().to_string(),
            price,
            discount_price,
            count_in_stock,
            sku: self.sku.trim().to_string(),
            category: self.category.trim().to_string(),
            brand: self.brand.trim().to_string(),
            sizes: split_list(&self.sizes),
            colors: split_list(&self.colors),
            collections: self.collections.trim().to_string(),
            material: self.material.trim().to_string(),
            gender: self.gender.trim().to_string(),
            images: Vec::new(),
        })
    }
}

fn parse_price(raw: &str) -> std::result::Result<Decimal, String> {
    let raw = raw.trim().trim_start_matches('$');
    match raw.parse::<Decimal>() {
        Ok(price) if price >= Decimal::ZERO => Ok(price),
        _ => Err(format!("Invalid price: {raw}")),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(String::from)
        .collect()
}

/// Products list page template.
#[derive(Template)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub toast: Option<Toast>,
    pub products: Vec<ProductRow>,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "products/row.html")]
pub struct ProductRowTemplate {
    pub product: ProductRow,
}

/// Edit form template.
#[derive(Template)]
#[template(path = "products/edit.html")]
pub struct ProductEditTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub toast: Option<Toast>,
    pub id: String,
    pub form: ProductForm,
    pub image_url: Option<String>,
}

fn failed(status: StatusCode, message: String) -> Response {
    (status, toast_trigger(&Toast::error(message))).into_response()
}

/// Fetch every product into the admin namespace.
async fn load_products(
    state: &AppState,
    session: &AdminSession,
    admin: &CurrentAdmin,
) -> Result<AdminProductsState> {
    let mut products = session.load::<AdminProductsState>().await?;
    products.begin();
    match state.api().list_admin_products(&admin.token).await {
        Ok(list) => products.listed(list),
        Err(e) => {
            tracing::error!("Failed to fetch products: {e}");
            products.reject(e.user_message(messages::FETCH_PRODUCTS_FAILED));
        }
    }
    session.save(&products).await?;
    Ok(products)
}

/// Products list page handler.
#[instrument(skip_all)]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: AdminSession,
) -> Result<Html<String>> {
    let products = load_products(&state, &session, &admin).await?;

    let template = ProductsIndexTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: "/products".to_string(),
        toast: session.take_flash().await?,
        products: products.data.products.iter().map(ProductRow::from).collect(),
        error: products.error,
    };
    Ok(Html(template.render()?))
}

/// POST /products
#[instrument(skip_all)]
pub async fn create(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: AdminSession,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let input = match form.to_input() {
        Ok(input) => input,
        Err(message) => return Ok(failed(StatusCode::UNPROCESSABLE_ENTITY, message)),
    };

    let mut products = session.load::<AdminProductsState>().await?;
    match state.api().create_product(&admin.token, &input).await {
        Ok(product) => {
            tracing::info!(product_id = %product.id, "Product created");
            let row = ProductRowTemplate {
                product: ProductRow::from(&product),
            };
            products.created(product);
            session.save(&products).await?;
            Ok((
                toast_trigger(&Toast::success("Product created successfully")),
                Html(row.render()?),
            )
                .into_response())
        }
        Err(e) => {
            tracing::warn!("Failed to create product: {e}");
            let message = e.user_message(messages::CREATE_PRODUCT_FAILED);
            products.reject(message.clone());
            session.save(&products).await?;
            Ok(failed(StatusCode::BAD_GATEWAY, message))
        }
    }
}

/// GET /products/{id}/edit
///
/// Uses the cached listing, fetching it when the product is not there.
#[instrument(skip(admin, state, session))]
pub async fn edit(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<String>,
) -> Result<Html<String>> {
    let id = ProductId::new(id);
    let mut products = session.load::<AdminProductsState>().await?;
    if products.find(&id).is_none() {
        products = load_products(&state, &session, &admin).await?;
    }
    let product = products
        .find(&id)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let template = ProductEditTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: "/products".to_string(),
        toast: session.take_flash().await?,
        id: id.to_string(),
        form: ProductForm::from(product),
        image_url: product.primary_image().map(|image| image.url.clone()),
    };
    Ok(Html(template.render()?))
}

/// Read the edit form: text fields plus an optional `image` file.
async fn read_edit_form(
    mut multipart: Multipart,
) -> Result<(ProductForm, Option<ImageUpload>)> {
    let mut form = ProductForm::default();
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "image" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().map(String::from);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            // Browsers send an empty part when no file was chosen
            if !file_name.is_empty() && !bytes.is_empty() {
                image = Some(ImageUpload {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            form.set(&name, value);
        }
    }

    Ok((form, image))
}

/// POST /products/{id}
///
/// A new image is uploaded first and replaces the product's images; without
/// one the backend keeps the existing images.
#[instrument(skip(admin, state, session, multipart))]
pub async fn update(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Response> {
    let id = ProductId::new(id);
    let (form, image) = read_edit_form(multipart).await?;

    let rerender = |status: StatusCode, message: String, form: ProductForm| -> Result<Response> {
        let template = ProductEditTemplate {
            admin_user: AdminUserView::from(&admin),
            current_path: "/products".to_string(),
            toast: Some(Toast::error(message)),
            id: id.to_string(),
            form,
            image_url: None,
        };
        Ok((status, Html(template.render()?)).into_response())
    };

    let mut input = match form.to_input() {
        Ok(input) => input,
        Err(message) => return rerender(StatusCode::UNPROCESSABLE_ENTITY, message, form),
    };

    if let Some(image) = image {
        match state.api().upload_image(&admin.token, image).await {
            Ok(url) => {
                input.images = vec![ProductImage {
                    url,
                    alt_text: Some(input.name.clone()),
                }];
            }
            Err(e) => {
                tracing::warn!("Image upload failed: {e}");
                let message = e.user_message(messages::UPLOAD_IMAGE_FAILED);
                return rerender(StatusCode::BAD_GATEWAY, message, form);
            }
        }
    }

    let mut products = session.load::<AdminProductsState>().await?;
    match state.api().update_product(&admin.token, &id, &input).await {
        Ok(product) => {
            tracing::info!(product_id = %product.id, "Product updated");
            products.updated(product);
            session.save(&products).await?;
            session
                .flash(Toast::success("Product updated successfully"))
                .await?;
            Ok(Redirect::to("/products").into_response())
        }
        Err(e) => {
            tracing::warn!("Failed to update product: {e}");
            let message = e.user_message(messages::UPDATE_PRODUCT_FAILED);
            products.reject(message.clone());
            session.save(&products).await?;
            rerender(StatusCode::BAD_GATEWAY, message, form)
        }
    }
}

/// POST /products/{id}/delete
#[instrument(skip(admin, state, session))]
pub async fn delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<String>,
) -> Result<Response> {
    let id = ProductId::new(id);
    let mut products = session.load::<AdminProductsState>().await?;

    match state.api().delete_product(&admin.token, &id).await {
        Ok(()) => {
            products.deleted(&id);
            session.save(&products).await?;
            Ok((
                toast_trigger(&Toast::success("Product deleted successfully")),
                Html(String::new()),
            )
                .into_response())
        }
        Err(e) => {
            tracing::warn!("Failed to delete product: {e}");
            let message = e.user_message(messages::DELETE_PRODUCT_FAILED);
            products.reject(message.clone());
            session.save(&products).await?;
            Ok(failed(StatusCode::BAD_GATEWAY, message))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(name: &str, price: &str) -> ProductForm {
        ProductForm {
            name: name.to_string(),
            price: price.to_string(),
            ..ProductForm::default()
        }
    }

    #[test]
    fn test_name_and_price_required() {
        assert_eq!(
            form("", "10").to_input().unwrap_err(),
            messages::FILL_ALL_FIELDS
        );
        assert_eq!(
            form("Tee", " ").to_input().unwrap_err(),
            messages::FILL_ALL_FIELDS
        );
        assert!(form("Tee", "-1").to_input().is_err());
    }

    #[test]
    fn test_lists_split_and_stock_defaults() {
        let mut form = form("Tee", "$19.99");
        form.set("sizes", "S, M ,,L".to_string());
        form.set("colors", "Red".to_string());
        form.set("unknown", "ignored".to_string());

        let input = form.to_input().unwrap();
        assert_eq!(input.price, Decimal::new(1999, 2));
        assert_eq!(input.sizes, ["S", "M", "L"]);
        assert_eq!(input.colors, ["Red"]);
        assert_eq!(input.count_in_stock, 0);
        assert!(input.discount_price.is_none());
        assert!(input.images.is_empty());
    }

    #[test]
    fn test_form_prefills_from_product() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "_id": "p1", "name": "Tee", "price": 25, "sizes": ["S", "M"],
            "countInStock": 3, "discountPrice": 20
        }))
        .unwrap();
        let form = ProductForm::from(&product);
        assert_eq!(form.sizes, "S, M");
        assert_eq!(form.count_in_stock, "3");

        let input = form.to_input().unwrap();
        assert_eq!(input.discount_price, Some(Decimal::from(20)));
    }
}
