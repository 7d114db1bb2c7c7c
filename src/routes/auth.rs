//! Signup / login / logout endpoints

use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::Json;
use serde::Deserialize;

use crate::auth::token::{TokenPair, ACCESS_TOKEN_HEADER};
use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::service;
use crate::state::AppState;
use crate::Result;

pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<service::auth::SignupRequest>,
) -> Result<(StatusCode, Json<ApiResponse>)> {
    let user_id = service::auth::signup(&state.db, req).await?;
    tracing::info!(%user_id, "user signed up");
    Ok((StatusCode::CREATED, Json(ApiResponse::success("signup complete"))))
}

#[derive(Debug, Deserialize)]
pub struct CheckEmailParams {
    pub email: String,
}

pub async fn check_email(
    State(state): State<AppState>,
    Query(params): Query<CheckEmailParams>,
) -> Result<Json<serde_json::Value>> {
    let taken = service::auth::email_taken(&state.db, &params.email).await?;
    Ok(Json(serde_json::json!({ "available": !taken })))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<service::auth::LoginRequest>,
) -> Result<(HeaderMap, Json<ApiResponse<TokenPair>>)> {
    let pair = service::auth::login(&state.db, &state.jwt, req).await?;
    Ok((token_headers(&pair), Json(ApiResponse::with_data("login succeeded", pair))))
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<service::auth::RefreshRequest>,
) -> Result<(HeaderMap, Json<ApiResponse<TokenPair>>)> {
    let pair = service::auth::refresh(&state.db, &state.jwt, req).await?;
    Ok((token_headers(&pair), Json(ApiResponse::with_data("token refreshed", pair))))
}

pub async fn logout(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ApiResponse>> {
    service::auth::logout(&state.db, user_id).await?;
    Ok(Json(ApiResponse::success("logout complete")))
}

fn token_headers(pair: &TokenPair) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", pair.access_token)) {
        headers.insert(ACCESS_TOKEN_HEADER, value);
    }
    headers
}
