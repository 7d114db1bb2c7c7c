//! My-page lookups, address book, and account withdrawal

use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::address::Address;
use crate::domain::order::Order;
use crate::{Error, Result};

#[derive(Debug, Serialize)]
pub struct MyInformation {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub balance: i64,
}

pub async fn my_information(db: &PgPool, user_id: Uuid) -> Result<MyInformation> {
    let row: (Uuid, String, String, i64) = sqlx::query_as(
        "SELECT u.id, u.email, u.name, b.amount \
         FROM users u JOIN balances b ON b.user_id = u.id \
         WHERE u.id = $1 AND u.deleted_at IS NULL",
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| Error::NotFound("user not found".into()))?;
    Ok(MyInformation { id: row.0, email: row.1, name: row.2, balance: row.3 })
}

/// Soft-delete the account and revoke the session.
pub async fn withdraw(db: &PgPool, user_id: Uuid) -> Result<()> {
    let mut tx = db.begin().await?;
    let updated = sqlx::query(
        "UPDATE users SET deleted_at = NOW(), updated_at = NOW() \
         WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(user_id)
    .execute(&mut *tx)
    .await?;
    if updated.rows_affected() == 0 {
        return Err(Error::NotFound("user not found".into()));
    }
    sqlx::query("UPDATE logins SET refresh_token = NULL, updated_at = NOW() WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(())
}

pub async fn list_addresses(db: &PgPool, user_id: Uuid) -> Result<Vec<Address>> {
    Ok(
        sqlx::query_as::<_, Address>(
            "SELECT * FROM addresses WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(db)
        .await?,
    )
}

pub async fn list_orders(db: &PgPool, user_id: Uuid) -> Result<Vec<Order>> {
    Ok(sqlx::query_as::<_, Order>(
        "SELECT o.* FROM orders o \
         JOIN carts c ON c.id = o.cart_id \
         WHERE c.user_id = $1 \
         ORDER BY o.created_at DESC",
    )
    .bind(user_id)
    .fetch_all(db)
    .await?)
}
