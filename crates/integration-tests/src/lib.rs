//! Integration test harness for Bazaar.
//!
//! [`MockBackend`] is an axum app on an ephemeral port that speaks the shop
//! backend's REST dialect, with seeded users, products and orders. The
//! storefront and admin routers run in-process against it through
//! [`TestClient`], which carries the session cookie between requests.
//! No database is needed: sessions use the in-memory store and the pool is
//! never connected.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bazaar-integration-tests
//! ```

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::body::Body;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, Request, StatusCode, header};
use axum::response::Response;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use bazaar_core::OrderStatus;
use bazaar_core::models::{Cart, CartLine, Checkout, Order, Product, ProductInput, User};
use bazaar_core::types::ProductId;
use secrecy::SecretString;
use serde_json::{Value, json};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use tower_sessions::MemoryStore;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin-pass";
pub const SHOPPER_EMAIL: &str = "shopper@example.com";
pub const SHOPPER_PASSWORD: &str = "shopper-pass";

/// Everything the mock backend knows, plus a log of the calls it served.
#[derive(Debug, Default)]
pub struct BackendData {
    pub users: Vec<(User, String)>,
    pub products: Vec<Product>,
    pub orders: Vec<Order>,
    /// Carts keyed by `user:<id>` or `guest:<id>`.
    pub carts: HashMap<String, Vec<CartLine>>,
    pub uploads: Vec<String>,
    /// Checkouts with the id of the user who created them.
    pub checkouts: Vec<(String, Checkout)>,
    /// `METHOD /path` of every request.
    pub calls: Vec<String>,
}

impl BackendData {
    fn seeded() -> Self {
        let user = |id: &str, name: &str, email: &str, role: &str| -> User {
            serde_json::from_value(json!({"_id": id, "name": name, "email": email, "role": role}))
                .expect("valid user")
        };
        let product = |value: Value| -> Product { serde_json::from_value(value).expect("valid product") };
        let order = |value: Value| -> Order { serde_json::from_value(value).expect("valid order") };

        Self {
            users: vec![
                (user("a1", "Ada Admin", ADMIN_EMAIL, "admin"), ADMIN_PASSWORD.to_string()),
                (user("u1", "Sam Shopper", SHOPPER_EMAIL, "customer"), SHOPPER_PASSWORD.to_string()),
            ],
            products: vec![
                product(json!({
                    "_id": "p1", "name": "Oxford Shirt", "price": 40, "countInStock": 10,
                    "sizes": ["S", "M"], "colors": ["Blue"], "category": "Top Wear",
                    "images": [{"url": "https://cdn.example.com/oxford.jpg"}]
                })),
                product(json!({
                    "_id": "p2", "name": "Chino", "price": 55, "countInStock": 4,
                    "sizes": ["32"], "colors": ["Khaki"], "category": "Bottom Wear"
                })),
            ],
            orders: vec![
                order(json!({
                    "_id": "665f00aa11bb22cc", "user": {"_id": "u1", "name": "Sam Shopper"},
                    "totalPrice": 40, "status": "Processing",
                    "orderItems": [{"productId": "p1", "name": "Oxford Shirt", "price": 40, "quantity": 1}]
                })),
                order(json!({
                    "_id": "665f00aa11bb22dd", "totalPrice": 55, "isPaid": true,
                    "status": "Delivered", "isDelivered": true
                })),
            ],
            ..Self::default()
        }
    }

    fn cart(&self, key: &str) -> Cart {
        let products = self.carts.get(key).cloned().unwrap_or_default();
        let total_price = products.iter().map(CartLine::line_total).sum();
        Cart {
            products,
            total_price,
            ..Cart::default()
        }
    }
}

type Shared = Arc<Mutex<BackendData>>;
type Failure = (StatusCode, Json<Value>);

fn fail(status: StatusCode, message: &str) -> Failure {
    (status, Json(json!({ "message": message })))
}

fn lock(state: &Shared) -> MutexGuard<'_, BackendData> {
    state.lock().expect("backend state poisoned")
}

/// The user behind a `Bearer token-<id>` header.
fn bearer(state: &Shared, headers: &HeaderMap) -> Result<User, Failure> {
    let id = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer token-"))
        .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "Not authorized, no token"))?;
    lock(state)
        .users
        .iter()
        .find(|(user, _)| user.id.as_str() == id)
        .map(|(user, _)| user.clone())
        .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "Not authorized, token failed"))
}

fn require_admin(state: &Shared, headers: &HeaderMap) -> Result<(), Failure> {
    if bearer(state, headers)?.role.is_admin() {
        Ok(())
    } else {
        Err(fail(StatusCode::FORBIDDEN, "Not authorized as an admin"))
    }
}

fn cart_key(fields: &HashMap<String, String>) -> Result<String, Failure> {
    if let Some(user) = fields.get("userId") {
        Ok(format!("user:{user}"))
    } else if let Some(guest) = fields.get("guestId") {
        Ok(format!("guest:{guest}"))
    } else {
        Err(fail(StatusCode::BAD_REQUEST, "userId or guestId is required"))
    }
}

fn string_fields(body: &Value) -> HashMap<String, String> {
    body.as_object()
        .map(|object| {
            object
                .iter()
                .filter_map(|(key, value)| value.as_str().map(|s| (key.clone(), s.to_string())))
                .collect()
        })
        .unwrap_or_default()
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Result<Json<Value>, Failure> {
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    let data = lock(&state);
    let (user, _) = data
        .users
        .iter()
        .find(|(user, secret)| user.email.as_str() == email && secret == password)
        .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "Invalid email or password"))?;
    Ok(Json(json!({ "user": user, "token": format!("token-{}", user.id) })))
}

async fn get_cart(
    State(state): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Cart>, Failure> {
    let key = cart_key(&query)?;
    let data = lock(&state);
    if !data.carts.contains_key(&key) {
        return Err(fail(StatusCode::NOT_FOUND, "Cart not found"));
    }
    Ok(Json(data.cart(&key)))
}

async fn add_to_cart(State(state): State<Shared>, Json(body): Json<Value>) -> Result<Json<Cart>, Failure> {
    let fields = string_fields(&body);
    let key = cart_key(&fields)?;
    let product_id = ProductId::new(fields.get("productId").cloned().unwrap_or_default());
    let size = fields.get("size").cloned().unwrap_or_default();
    let color = fields.get("color").cloned().unwrap_or_default();
    let quantity = body["quantity"].as_u64().and_then(|q| u32::try_from(q).ok()).unwrap_or(1);

    let mut data = lock(&state);
    let product = data
        .products
        .iter()
        .find(|product| product.id == product_id)
        .cloned()
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Product not found"))?;
    let lines = data.carts.entry(key.clone()).or_default();
    match lines.iter_mut().find(|line| line.matches(&product_id, &size, &color)) {
        Some(line) => line.quantity += quantity,
        None => lines.push(CartLine {
            product_id,
            name: product.name.clone(),
            image: product.primary_image().map(|image| image.url.clone()).unwrap_or_default(),
            price: product.price,
            size,
            color,
            quantity,
        }),
    }
    Ok(Json(data.cart(&key)))
}

async fn update_cart(State(state): State<Shared>, Json(body): Json<Value>) -> Result<Json<Cart>, Failure> {
    let fields = string_fields(&body);
    let key = cart_key(&fields)?;
    let product_id = ProductId::new(fields.get("productId").cloned().unwrap_or_default());
    let size = fields.get("size").cloned().unwrap_or_default();
    let color = fields.get("color").cloned().unwrap_or_default();
    let quantity = body["quantity"].as_u64().and_then(|q| u32::try_from(q).ok()).unwrap_or(0);

    let mut data = lock(&state);
    let lines = data
        .carts
        .get_mut(&key)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Cart not found"))?;
    let index = lines
        .iter()
        .position(|line| line.matches(&product_id, &size, &color))
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Product not found in cart"))?;
    if quantity == 0 {
        lines.remove(index);
    } else if let Some(line) = lines.get_mut(index) {
        line.quantity = quantity;
    }
    Ok(Json(data.cart(&key)))
}

async fn remove_from_cart(
    State(state): State<Shared>,
    Json(body): Json<Value>,
) -> Result<Json<Cart>, Failure> {
    let fields = string_fields(&body);
    let key = cart_key(&fields)?;
    let product_id = ProductId::new(fields.get("productId").cloned().unwrap_or_default());
    let size = fields.get("size").cloned().unwrap_or_default();
    let color = fields.get("color").cloned().unwrap_or_default();

    let mut data = lock(&state);
    let lines = data
        .carts
        .get_mut(&key)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Cart not found"))?;
    lines.retain(|line| !line.matches(&product_id, &size, &color));
    Ok(Json(data.cart(&key)))
}

async fn merge_cart(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, Failure> {
    let user = bearer(&state, &headers)?;
    let guest = body["guestId"].as_str().unwrap_or_default();

    let mut data = lock(&state);
    let Some(guest_lines) = data.carts.remove(&format!("guest:{guest}")) else {
        return Err(fail(StatusCode::NOT_FOUND, "Guest cart not found"));
    };
    let lines = data.carts.entry(format!("user:{}", user.id)).or_default();
    for incoming in guest_lines {
        match lines
            .iter_mut()
            .find(|line| line.matches(&incoming.product_id, &incoming.size, &incoming.color))
        {
            Some(line) => line.quantity += incoming.quantity,
            None => lines.push(incoming),
        }
    }
    Ok(Json(json!({ "message": "Carts merged" })))
}

async fn get_product(
    State(state): State<Shared>,
    Path(id): Path<String>,
) -> Result<Json<Product>, Failure> {
    lock(&state)
        .products
        .iter()
        .find(|product| product.id.as_str() == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Product not found"))
}

async fn admin_users(State(state): State<Shared>, headers: HeaderMap) -> Result<Json<Vec<User>>, Failure> {
    require_admin(&state, &headers)?;
    Ok(Json(lock(&state).users.iter().map(|(user, _)| user.clone()).collect()))
}

async fn admin_create_user(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<User>, Failure> {
    require_admin(&state, &headers)?;
    let mut data = lock(&state);
    if data.users.iter().any(|(user, _)| user.email.as_str() == body["email"]) {
        return Err(fail(StatusCode::BAD_REQUEST, "User already exists"));
    }
    let id = format!("u{}", data.users.len() + 1);
    let user: User = serde_json::from_value(json!({
        "_id": id, "name": body["name"], "email": body["email"], "role": body["role"]
    }))
    .map_err(|e| fail(StatusCode::BAD_REQUEST, &e.to_string()))?;
    let password = body["password"].as_str().unwrap_or_default().to_string();
    data.users.push((user.clone(), password));
    Ok(Json(user))
}

async fn admin_products(
    State(state): State<Shared>,
    headers: HeaderMap,
) -> Result<Json<Vec<Product>>, Failure> {
    require_admin(&state, &headers)?;
    Ok(Json(lock(&state).products.clone()))
}

fn product_from_input(id: &str, input: &ProductInput) -> Result<Product, Failure> {
    let mut value = serde_json::to_value(input).map_err(|e| fail(StatusCode::BAD_REQUEST, &e.to_string()))?;
    value["_id"] = json!(id);
    serde_json::from_value(value).map_err(|e| fail(StatusCode::BAD_REQUEST, &e.to_string()))
}

async fn admin_create_product(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(input): Json<ProductInput>,
) -> Result<(StatusCode, Json<Product>), Failure> {
    require_admin(&state, &headers)?;
    let mut data = lock(&state);
    let product = product_from_input(&format!("p{}", data.products.len() + 1), &input)?;
    data.products.push(product.clone());
    Ok((StatusCode::CREATED, Json(product)))
}

async fn admin_update_product(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(input): Json<ProductInput>,
) -> Result<Json<Product>, Failure> {
    require_admin(&state, &headers)?;
    let mut data = lock(&state);
    let existing = data
        .products
        .iter_mut()
        .find(|product| product.id.as_str() == id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Product not found"))?;
    let mut updated = product_from_input(&id, &input)?;
    if updated.images.is_empty() {
        updated.images = existing.images.clone();
    }
    *existing = updated.clone();
    Ok(Json(updated))
}

async fn admin_delete_product(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, Failure> {
    require_admin(&state, &headers)?;
    let mut data = lock(&state);
    let before = data.products.len();
    data.products.retain(|product| product.id.as_str() != id);
    if data.products.len() == before {
        return Err(fail(StatusCode::NOT_FOUND, "Product not found"));
    }
    Ok(Json(json!({ "message": "Product removed" })))
}

async fn admin_orders(State(state): State<Shared>, headers: HeaderMap) -> Result<Json<Vec<Order>>, Failure> {
    require_admin(&state, &headers)?;
    Ok(Json(lock(&state).orders.clone()))
}

async fn admin_update_order(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Order>, Failure> {
    require_admin(&state, &headers)?;
    let status: OrderStatus = serde_json::from_value(body["status"].clone())
        .map_err(|_| fail(StatusCode::BAD_REQUEST, "Invalid status"))?;
    let mut data = lock(&state);
    let order = data
        .orders
        .iter_mut()
        .find(|order| order.id.as_str() == id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Order not found"))?;
    order.status = status;
    order.is_delivered = status == OrderStatus::Delivered;
    Ok(Json(order.clone()))
}

async fn admin_delete_order(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, Failure> {
    require_admin(&state, &headers)?;
    let mut data = lock(&state);
    let before = data.orders.len();
    data.orders.retain(|order| order.id.as_str() != id);
    if data.orders.len() == before {
        return Err(fail(StatusCode::NOT_FOUND, "Order not found"));
    }
    Ok(Json(json!({ "message": "Order removed" })))
}

async fn upload(
    State(state): State<Shared>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<Value>, Failure> {
    require_admin(&state, &headers)?;
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("image") {
            let file_name = field.file_name().unwrap_or("upload").to_string();
            lock(&state).uploads.push(file_name.clone());
            return Ok(Json(json!({ "imageUrl": format!("https://cdn.example.com/{file_name}") })));
        }
    }
    Err(fail(StatusCode::BAD_REQUEST, "No file uploaded"))
}

async fn create_checkout(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Result<(StatusCode, Json<Checkout>), Failure> {
    let user = bearer(&state, &headers)?;
    if body["checkoutItem"].as_array().is_none_or(Vec::is_empty) {
        return Err(fail(StatusCode::BAD_REQUEST, "No items in checkout"));
    }

    let mut data = lock(&state);
    body["_id"] = json!(format!("c{}", data.checkouts.len() + 1));
    let checkout: Checkout = serde_json::from_value(body)
        .map_err(|e| fail(StatusCode::BAD_REQUEST, &e.to_string()))?;
    data.checkouts.push((user.id.to_string(), checkout.clone()));
    Ok((StatusCode::CREATED, Json(checkout)))
}

/// The caller's checkout with `id`.
fn own_checkout<'a>(
    data: &'a mut BackendData,
    user: &User,
    id: &str,
) -> Result<&'a mut Checkout, Failure> {
    data.checkouts
        .iter_mut()
        .find(|(owner, checkout)| owner == user.id.as_str() && checkout.id.as_str() == id)
        .map(|(_, checkout)| checkout)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Checkout not found"))
}

async fn pay_checkout(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Checkout>, Failure> {
    let user = bearer(&state, &headers)?;
    if body["paymentStatus"] != "Paid" {
        return Err(fail(StatusCode::BAD_REQUEST, "Invalid payment status"));
    }
    let mut data = lock(&state);
    let checkout = own_checkout(&mut data, &user, &id)?;
    checkout.is_paid = true;
    Ok(Json(checkout.clone()))
}

async fn finalize_checkout(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<Order>), Failure> {
    let user = bearer(&state, &headers)?;
    let mut data = lock(&state);
    let checkout = own_checkout(&mut data, &user, &id)?;
    if !checkout.is_paid {
        return Err(fail(StatusCode::BAD_REQUEST, "Checkout is not paid"));
    }
    if checkout.is_finalized {
        return Err(fail(StatusCode::BAD_REQUEST, "Checkout already finalized"));
    }
    checkout.is_finalized = true;
    let snapshot = serde_json::to_value(&*checkout).expect("checkout serializes");

    let order: Order = serde_json::from_value(json!({
        "_id": format!("665f00aa11bb{id:0>4}"),
        "user": {"_id": user.id, "name": user.name},
        "orderItems": snapshot["checkoutItems"],
        "shippingAddress": snapshot["shippingAddress"],
        "paymentMethod": snapshot["paymentMethod"],
        "totalPrice": snapshot["totalPrice"],
        "isPaid": true,
        "status": "Processing"
    }))
    .map_err(|e| fail(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()))?;
    data.orders.push(order.clone());
    data.carts.remove(&format!("user:{}", user.id));
    Ok((StatusCode::CREATED, Json(order)))
}

async fn record_call(
    State(state): State<Shared>,
    request: Request<Body>,
    next: axum::middleware::Next,
) -> Response {
    let call = format!("{} {}", request.method(), request.uri().path());
    lock(&state).calls.push(call);
    next.run(request).await
}

/// A running mock of the shop backend.
pub struct MockBackend {
    addr: SocketAddr,
    data: Shared,
}

impl MockBackend {
    /// Bind to an ephemeral port and serve the seeded backend.
    pub async fn spawn() -> Self {
        let data: Shared = Arc::new(Mutex::new(BackendData::seeded()));

        let router = Router::new()
            .route("/api/users/login", post(login))
            .route(
                "/api/cart",
                get(get_cart).post(add_to_cart).put(update_cart).delete(remove_from_cart),
            )
            .route("/api/cart/merge", post(merge_cart))
            .route("/api/products/{id}", get(get_product))
            .route("/api/checkout", post(create_checkout))
            .route("/api/checkout/{id}/pay", put(pay_checkout))
            .route("/api/checkout/{id}/finalize", post(finalize_checkout))
            .route("/api/admin/users", get(admin_users).post(admin_create_user))
            .route("/api/admin/products", get(admin_products).post(admin_create_product))
            .route(
                "/api/admin/products/{id}",
                put(admin_update_product).delete(admin_delete_product),
            )
            .route("/api/admin/orders", get(admin_orders))
            .route(
                "/api/admin/orders/{id}",
                put(admin_update_order).delete(admin_delete_order),
            )
            .route("/api/upload", post(upload))
            .layer(axum::middleware::from_fn_with_state(data.clone(), record_call))
            .with_state(data.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().expect("mock backend address");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("mock backend");
        });

        Self { addr, data }
    }

    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Inspect or change the backend's data.
    pub fn data(&self) -> MutexGuard<'_, BackendData> {
        lock(&self.data)
    }

    /// Whether a `METHOD /path` request was served.
    #[must_use]
    pub fn was_called(&self, call: &str) -> bool {
        self.data().calls.iter().any(|served| served == call)
    }
}

fn secret(value: &str) -> SecretString {
    SecretString::from(value.to_string())
}

const TEST_SESSION_SECRET: &str = "kJ8#mN2$pQ5^rT9&vX3*zB6!cF4@hL7%";

/// Storefront config pointing at `backend_url`.
#[must_use]
pub fn storefront_config(backend_url: &str) -> bazaar_storefront::config::StorefrontConfig {
    bazaar_storefront::config::StorefrontConfig {
        database_url: secret("postgres://localhost/bazaar_test"),
        host: "127.0.0.1".parse().expect("valid host"),
        port: 3000,
        base_url: "http://localhost:3000".to_string(),
        session_secret: secret(TEST_SESSION_SECRET),
        backend_url: backend_url.to_string(),
        paypal: bazaar_storefront::config::PayPalConfig {
            client_id: "test-client".to_string(),
            currency: bazaar_core::CurrencyCode::USD,
        },
        log_json: false,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 0.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// Admin config pointing at `backend_url`.
#[must_use]
pub fn admin_config(backend_url: &str) -> bazaar_admin::config::AdminConfig {
    bazaar_admin::config::AdminConfig {
        database_url: secret("postgres://localhost/bazaar_test"),
        host: "127.0.0.1".parse().expect("valid host"),
        port: 3001,
        base_url: "http://localhost:3001".to_string(),
        session_secret: secret(TEST_SESSION_SECRET),
        backend_url: backend_url.to_string(),
        log_json: false,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 0.0,
        sentry_traces_sample_rate: 0.0,
    }
}

fn lazy_pool() -> sqlx::PgPool {
    PgPoolOptions::new()
        .connect_lazy("postgres://localhost/bazaar_test")
        .expect("lazy pool")
}

/// The storefront router with in-memory sessions.
#[must_use]
pub fn storefront_app(backend: &MockBackend) -> Router {
    let config = storefront_config(&backend.url());
    let layer = bazaar_storefront::middleware::session_layer(MemoryStore::default(), &config);
    let state = bazaar_storefront::state::AppState::new(config, lazy_pool()).expect("storefront state");
    bazaar_storefront::app(state, layer)
}

/// The admin router with in-memory sessions.
#[must_use]
pub fn admin_app(backend: &MockBackend) -> Router {
    let config = admin_config(&backend.url());
    let layer = bazaar_admin::middleware::session_layer(MemoryStore::default(), &config);
    let state = bazaar_admin::state::AppState::new(config, lazy_pool()).expect("admin state");
    bazaar_admin::app(state, layer)
}

/// A response read to the end.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.header("location")
    }
}

/// Drives a router in-process, keeping the session cookie like a browser.
pub struct TestClient {
    router: Router,
    cookie: Option<String>,
}

impl TestClient {
    #[must_use]
    pub const fn new(router: Router) -> Self {
        Self {
            router,
            cookie: None,
        }
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Request::get(uri), Body::empty()).await
    }

    /// GET as htmx would, asking for a fragment.
    pub async fn get_htmx(&mut self, uri: &str) -> TestResponse {
        self.send(Request::get(uri).header("hx-request", "true"), Body::empty())
            .await
    }

    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        self.send(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .header("hx-request", "true"),
            Body::from(body),
        )
        .await
    }

    /// POST a JSON body, as page scripts do.
    pub async fn post_json(&mut self, uri: &str, body: &Value) -> TestResponse {
        self.send(
            Request::post(uri).header(header::CONTENT_TYPE, "application/json"),
            Body::from(body.to_string()),
        )
        .await
    }

    async fn send(&mut self, builder: axum::http::request::Builder, body: Body) -> TestResponse {
        // Rate limiters key on the client address
        let mut builder = builder.header("x-forwarded-for", "203.0.113.7");
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = builder.body(body).expect("valid request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("infallible router");

        if let Some(set_cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            && let Some(pair) = set_cookie.split(';').next()
        {
            self.cookie = Some(pair.to_string());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}
