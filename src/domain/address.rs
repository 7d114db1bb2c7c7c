//! Address book rows

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A user may hold at most this many addresses; enforced before insert.
pub const MAX_ADDRESSES_PER_USER: usize = 5;

/// At most one address per user carries `is_default`; setting a new default
/// clears the prior one first. `is_order_origin` marks addresses created
/// through order placement rather than the address book.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Address {
    pub id: Uuid,
    pub user_id: Uuid,
    pub main_address: String,
    pub detail_address: Option<String>,
    pub postal_code: String,
    pub is_default: bool,
    pub is_order_origin: bool,
    pub created_at: DateTime<Utc>,
}
