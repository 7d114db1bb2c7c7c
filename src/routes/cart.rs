//! Cart and order endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::domain::cart::PricedCartLine;
use crate::response::ApiResponse;
use crate::service;
use crate::service::order::{OrderCartRequest, PlacedOrder};
use crate::state::AppState;
use crate::Result;

pub async fn list_cart(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<PricedCartLine>>> {
    Ok(Json(service::cart::list_cart(&state.db, user_id).await?))
}

pub async fn add_cart(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(product_id): Path<Uuid>,
    Json(req): Json<service::cart::AddCartRequest>,
) -> Result<(StatusCode, Json<ApiResponse>)> {
    service::cart::add_cart(&state.db, user_id, product_id, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success("added to cart"))))
}

pub async fn update_cart(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(cart_id): Path<Uuid>,
    Json(req): Json<service::cart::UpdateCartRequest>,
) -> Result<Json<ApiResponse>> {
    let removed = req.is_deleted;
    service::cart::update_cart(&state.db, user_id, cart_id, req).await?;
    let message = if removed { "cart line removed" } else { "cart line updated" };
    Ok(Json(ApiResponse::success(message)))
}

#[derive(Debug, Deserialize)]
pub struct OrderCartBody {
    pub cart_ids: Vec<Uuid>,
    #[serde(default)]
    pub order: OrderCartRequest,
}

pub async fn order_cart(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<OrderCartBody>,
) -> Result<(StatusCode, Json<ApiResponse<PlacedOrder>>)> {
    let placed =
        service::order::place_order(&state.db, &state.nats, user_id, &body.cart_ids, body.order)
            .await?;
    tracing::info!(%user_id, total = placed.total, orders = placed.order_ids.len(), "order placed");
    Ok((StatusCode::CREATED, Json(ApiResponse::with_data("order placed", placed))))
}
