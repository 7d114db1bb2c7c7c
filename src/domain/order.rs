//! Order rows

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// An immutable record of a cart line's conversion into a purchase. The count
/// is copied from the line at purchase time; there is no cancellation path.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Order {
    pub id: Uuid,
    pub cart_id: Uuid,
    pub delivery_id: Uuid,
    pub count: i32,
    pub created_at: DateTime<Utc>,
}
