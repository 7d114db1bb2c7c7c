//! Stock and balance ledger operations
//!
//! Both ledgers are mutated only inside the order-placement transaction. The
//! rows involved are locked up front (`FOR UPDATE`) so concurrent placements
//! against the same user or option serialize instead of losing updates.

use sqlx::PgConnection;
use uuid::Uuid;

use crate::domain::user::Balance;
use crate::{Error, Result};

/// Lock and return the user's balance row for the rest of the transaction.
pub async fn lock_balance(conn: &mut PgConnection, user_id: Uuid) -> Result<Balance> {
    sqlx::query_as::<_, Balance>("SELECT * FROM balances WHERE user_id = $1 FOR UPDATE")
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| Error::NotFound("balance not found".into()))
}

/// Debit the locked balance once, by the order total.
pub async fn debit_balance(conn: &mut PgConnection, user_id: Uuid, amount: i64) -> Result<()> {
    sqlx::query("UPDATE balances SET amount = amount - $2, updated_at = NOW() WHERE user_id = $1")
        .bind(user_id)
        .bind(amount)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Decrement option stock by the quantity taken from a cart line. Stock
/// sufficiency is checked at cart add/update time, not re-checked here.
pub async fn decrement_stock(conn: &mut PgConnection, option_id: Uuid, count: i32) -> Result<()> {
    sqlx::query("UPDATE product_options SET stock = stock - $2, updated_at = NOW() WHERE id = $1")
        .bind(option_id)
        .bind(count)
        .execute(&mut *conn)
        .await?;
    Ok(())
}
