//! My-page endpoints

use axum::extract::State;
use axum::Json;

use crate::auth::AuthUser;
use crate::domain::address::Address;
use crate::domain::order::Order;
use crate::response::ApiResponse;
use crate::service;
use crate::service::mypage::MyInformation;
use crate::state::AppState;
use crate::Result;

pub async fn my_information(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ApiResponse<MyInformation>>> {
    let info = service::mypage::my_information(&state.db, user_id).await?;
    Ok(Json(ApiResponse::with_data("my information", info)))
}

pub async fn withdrawal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ApiResponse>> {
    service::mypage::withdraw(&state.db, user_id).await?;
    tracing::info!(%user_id, "user withdrew");
    Ok(Json(ApiResponse::success("withdrawal complete")))
}

pub async fn list_addresses(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Address>>> {
    Ok(Json(service::mypage::list_addresses(&state.db, user_id).await?))
}

pub async fn list_orders(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Order>>> {
    Ok(Json(service::mypage::list_orders(&state.db, user_id).await?))
}
