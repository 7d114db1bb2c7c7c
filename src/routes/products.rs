//! Product catalog endpoints

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::product::{Product, ProductOption};
use crate::state::AppState;
use crate::{Error, Result};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: u32,
}

#[derive(Debug, Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub options: Vec<ProductOption>,
}

pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<PaginatedResponse<Product>>> {
    let page = params.page.unwrap_or(1).max(1);
    let per_page = params.per_page.unwrap_or(20).min(100);
    let products = sqlx::query_as::<_, Product>(
        "SELECT * FROM products WHERE status = 'active' ORDER BY created_at DESC LIMIT $1 OFFSET $2",
    )
    .bind(i64::from(per_page))
    .bind(i64::from((page - 1) * per_page))
    .fetch_all(&state.db)
    .await?;
    let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products WHERE status = 'active'")
        .fetch_one(&state.db)
        .await?;
    Ok(Json(PaginatedResponse { data: products, total: total.0, page }))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductDetail>> {
    let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| Error::NotFound("product not found".into()))?;
    let options = sqlx::query_as::<_, ProductOption>(
        "SELECT * FROM product_options WHERE product_id = $1 ORDER BY created_at",
    )
    .bind(id)
    .fetch_all(&state.db)
    .await?;
    Ok(Json(ProductDetail { product, options }))
}

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub options: Vec<CreateOptionRequest>,
}

#[derive(Debug, Deserialize)]
pub struct CreateOptionRequest {
    pub name: String,
    pub price: i64,
    pub stock: i32,
}

pub async fn create_product(
    State(state): State<AppState>,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductDetail>)> {
    if req.name.is_empty() || req.options.is_empty() {
        return Err(Error::InvalidInput("product requires a name and at least one option".into()));
    }
    if req.options.iter().any(|o| o.price < 0 || o.stock < 0) {
        return Err(Error::InvalidInput("option price and stock must not be negative".into()));
    }

    let mut tx = state.db.begin().await?;
    let product = sqlx::query_as::<_, Product>(
        "INSERT INTO products (id, name, description) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(&req.name)
    .bind(&req.description)
    .fetch_one(&mut *tx)
    .await?;

    let mut options = Vec::with_capacity(req.options.len());
    for option in &req.options {
        let row = sqlx::query_as::<_, ProductOption>(
            "INSERT INTO product_options (id, product_id, name, price, stock) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(product.id)
        .bind(&option.name)
        .bind(option.price)
        .bind(option.stock)
        .fetch_one(&mut *tx)
        .await?;
        options.push(row);
    }
    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(ProductDetail { product, options })))
}
