//! HTTP routing

pub mod auth;
pub mod cart;
pub mod mypage;
pub mod products;

use axum::routing::{get, patch, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/user/sign", post(auth::signup))
        .route("/api/v1/user/sign/check", get(auth::check_email))
        .route("/api/v1/user/login", post(auth::login))
        .route("/api/v1/user/refresh", post(auth::refresh))
        .route("/api/v1/user/logout", post(auth::logout))
        .route("/api/v1/user/me", get(mypage::my_information))
        .route("/api/v1/user/withdrawal", patch(mypage::withdrawal))
        .route("/api/v1/user/addresses", get(mypage::list_addresses))
        .route("/api/v1/user/orders", get(mypage::list_orders))
        .route("/api/v1/products", get(products::list_products).post(products::create_product))
        .route("/api/v1/products/:id", get(products::get_product))
        .route("/api/v1/cart", get(cart::list_cart))
        .route("/api/v1/cart/order", post(cart::order_cart))
        .route("/api/v1/cart/:id", post(cart::add_cart).put(cart::update_cart))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "healthy", "service": "shopmall"}))
}
