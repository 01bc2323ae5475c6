//! User-facing messages shared by the storefront and admin console.
//!
//! The `*_FAILED` strings are fallbacks: when the backend answers with a
//! `message` field, that text is shown instead.

// Cart
pub const FETCH_CART_FAILED: &str = "Failed to fetch cart";
pub const ADD_TO_CART_FAILED: &str = "Failed to add to cart";
pub const UPDATE_CART_FAILED: &str = "Failed to update cart quantity";
pub const REMOVE_FROM_CART_FAILED: &str = "Failed to remove item from cart";
pub const MERGE_CART_FAILED: &str = "Failed to merge carts";
pub const SELECT_SIZE_AND_COLOR: &str = "Please select a size and color before adding to cart";
pub const ADDED_TO_CART: &str = "Product added to cart!";

// Auth
pub const LOGIN_FAILED: &str = "Login failed";
pub const REGISTRATION_FAILED: &str = "Registration failed";
pub const PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match!";
pub const NOT_AN_ADMIN: &str = "Admin access required";

// Catalog
pub const FETCH_PRODUCTS_FAILED: &str = "Failed to fetch products";
pub const FETCH_PRODUCT_FAILED: &str = "Failed to fetch product details";
pub const LOAD_PRODUCTS_FAILED: &str = "Failed to load products";

// Checkout
pub const CART_EMPTY: &str = "Your cart is empty!";
pub const MISSING_REQUIRED_FIELDS: &str = "Please fill all required fields";
pub const CREATE_CHECKOUT_FAILED: &str = "Failed to create checkout";
pub const CHECKOUT_NOT_FOUND: &str = "Checkout ID not found. Please try again.";
pub const PAYMENT_FAILED: &str = "Payment verification failed. Try again.";
pub const PAYMENT_SUCCEEDED: &str = "Payment successful! Order confirmed.";

// Orders
pub const FETCH_MY_ORDERS_FAILED: &str = "Unable to fetch user orders";
pub const FETCH_ORDER_FAILED: &str = "Unable to fetch order details";

// Admin
pub const FETCH_USERS_FAILED: &str = "Failed to fetch users";
pub const ADD_USER_FAILED: &str = "Failed to add user";
pub const UPDATE_USER_FAILED: &str = "Failed to update user";
pub const DELETE_USER_FAILED: &str = "Failed to delete user";
pub const FILL_ALL_FIELDS: &str = "Please fill all fields";
pub const CREATE_PRODUCT_FAILED: &str = "Failed to create product";
pub const UPDATE_PRODUCT_FAILED: &str = "Failed to update product";
pub const DELETE_PRODUCT_FAILED: &str = "Failed to delete product";
pub const UPLOAD_IMAGE_FAILED: &str = "Failed to upload image";
pub const FETCH_ORDERS_FAILED: &str = "Failed to fetch orders";
pub const UPDATE_ORDER_FAILED: &str = "Failed to update order status";
pub const DELETE_ORDER_FAILED: &str = "Failed to delete order";
