//! Product catalog rows

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A purchasable variant of a product. Stock lives here and is only
/// decremented by order placement; adding to cart checks but never reserves.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProductOption {
    pub id: Uuid,
    pub product_id: Uuid,
    pub name: String,
    pub price: i64,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductOption {
    pub fn has_stock_for(&self, count: i32) -> bool {
        self.stock >= count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_check() {
        let option = ProductOption {
            id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            name: "L".into(),
            price: 30,
            stock: 2,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(option.has_stock_for(2));
        assert!(!option.has_stock_for(3));
    }
}
