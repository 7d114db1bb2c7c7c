//! Cart add / update / listing
//!
//! Adding to cart checks stock but does not reserve it; stock is only
//! decremented when the line is converted into an order.

use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::domain::cart::{CartLine, PricedCartLine};
use crate::domain::product::ProductOption;
use crate::{Error, Result};

#[derive(Debug, Deserialize, Validate)]
pub struct AddCartRequest {
    pub option_id: Uuid,
    #[validate(range(min = 1))]
    pub count: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCartRequest {
    pub product_id: Uuid,
    pub option_id: Uuid,
    #[validate(range(min = 1))]
    pub count: i32,
    #[serde(default)]
    pub is_deleted: bool,
}

pub async fn add_cart(
    db: &PgPool,
    user_id: Uuid,
    product_id: Uuid,
    req: AddCartRequest,
) -> Result<Uuid> {
    req.validate().map_err(|e| Error::InvalidInput(e.to_string()))?;
    let option = sqlx::query_as::<_, ProductOption>(
        "SELECT * FROM product_options WHERE id = $1 AND product_id = $2",
    )
    .bind(req.option_id)
    .bind(product_id)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| Error::NotFound("product option not found".into()))?;
    if !option.has_stock_for(req.count) {
        return Err(Error::InsufficientStock);
    }

    let existing: Option<(Uuid,)> = sqlx::query_as(
        "SELECT id FROM carts WHERE user_id = $1 AND product_option_id = $2 AND NOT is_deleted",
    )
    .bind(user_id)
    .bind(option.id)
    .fetch_optional(db)
    .await?;
    if existing.is_some() {
        return Err(Error::InvalidInput("option already in cart".into()));
    }

    let cart_id = Uuid::now_v7();
    sqlx::query("INSERT INTO carts (id, user_id, product_option_id, count) VALUES ($1, $2, $3, $4)")
        .bind(cart_id)
        .bind(user_id)
        .bind(option.id)
        .bind(req.count)
        .execute(db)
        .await?;
    Ok(cart_id)
}

pub async fn update_cart(
    db: &PgPool,
    user_id: Uuid,
    cart_id: Uuid,
    req: UpdateCartRequest,
) -> Result<()> {
    req.validate().map_err(|e| Error::InvalidInput(e.to_string()))?;
    let line = sqlx::query_as::<_, CartLine>("SELECT * FROM carts WHERE id = $1 AND user_id = $2")
        .bind(cart_id)
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| Error::NotFound("cart line not found".into()))?;

    // the line must belong to the product the caller claims to be editing
    let current: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM product_options WHERE id = $1 AND product_id = $2")
            .bind(line.product_option_id)
            .bind(req.product_id)
            .fetch_optional(db)
            .await?;
    if current.is_none() {
        return Err(Error::NotFound("cart line does not match product".into()));
    }

    let option = sqlx::query_as::<_, ProductOption>(
        "SELECT * FROM product_options WHERE id = $1 AND product_id = $2",
    )
    .bind(req.option_id)
    .bind(req.product_id)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| Error::InvalidInput("product option not found".into()))?;
    if !option.has_stock_for(req.count) {
        return Err(Error::InsufficientStock);
    }

    sqlx::query(
        "UPDATE carts SET product_option_id = $2, count = $3, is_deleted = $4, updated_at = NOW() \
         WHERE id = $1",
    )
    .bind(line.id)
    .bind(option.id)
    .bind(req.count)
    .bind(req.is_deleted)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn list_cart(db: &PgPool, user_id: Uuid) -> Result<Vec<PricedCartLine>> {
    Ok(sqlx::query_as::<_, PricedCartLine>(
        "SELECT c.id, c.product_option_id, p.name AS product_name, o.name AS option_name, \
                o.price, c.count \
         FROM carts c \
         JOIN product_options o ON o.id = c.product_option_id \
         JOIN products p ON p.id = o.product_id \
         WHERE c.user_id = $1 AND NOT c.is_deleted \
         ORDER BY c.created_at",
    )
    .bind(user_id)
    .fetch_all(db)
    .await?)
}
