//! Cart line rows

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A pending association between a user and a product option. Never deleted
/// physically; consumption by an order only flips `is_deleted`.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CartLine {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_option_id: Uuid,
    pub count: i32,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Cart line joined with its option and product, as fetched for listing and
/// for order placement.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PricedCartLine {
    pub id: Uuid,
    pub product_option_id: Uuid,
    pub product_name: String,
    pub option_name: String,
    pub price: i64,
    pub count: i32,
}

impl PricedCartLine {
    pub fn line_total(&self) -> i64 {
        self.price * i64::from(self.count)
    }
}

pub fn order_total(lines: &[PricedCartLine]) -> i64 {
    lines.iter().map(PricedCartLine::line_total).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(price: i64, count: i32) -> PricedCartLine {
        PricedCartLine {
            id: Uuid::new_v4(),
            product_option_id: Uuid::new_v4(),
            product_name: "Shirt".into(),
            option_name: "L".into(),
            price,
            count,
        }
    }

    #[test]
    fn test_order_total() {
        assert_eq!(order_total(&[line(30, 2), line(10, 1)]), 70);
        assert_eq!(order_total(&[]), 0);
    }
}
