//! Order placement workflow
//!
//! Converts a set of cart lines into orders inside one database transaction:
//! balance check, delivery resolution, order rows, stock decrements, cart
//! consumption, and a single balance debit. Validation happens over fetched
//! data before the first write, so a rejected placement leaves no change.

use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::domain::address::{Address, MAX_ADDRESSES_PER_USER};
use crate::domain::cart::{order_total, PricedCartLine};
use crate::domain::delivery::{Delivery, RequestNote, RequestType};
use crate::domain::events::{self, DomainEvent};
use crate::service::ledger;
use crate::{Error, Result};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderCartRequest {
    pub recipient: Option<String>,
    pub contact_primary: Option<String>,
    pub contact_secondary: Option<String>,
    pub postal_code: Option<String>,
    pub main_address: Option<String>,
    pub detail_address: Option<String>,
    #[serde(default)]
    pub is_default: bool,
    pub label: Option<String>,
    pub request_type: Option<RequestType>,
    pub custom_request: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PlacedOrder {
    pub order_ids: Vec<Uuid>,
    pub delivery_id: Uuid,
    pub total: i64,
}

// =============================================================================
// Planning (pure decision logic over fetched data)
// =============================================================================

/// Delivery target decided before any write.
#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryPlan {
    Reuse { address_id: Uuid },
    Create(NewDelivery),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewDelivery {
    pub recipient: String,
    pub contact_primary: String,
    pub contact_secondary: Option<String>,
    pub postal_code: String,
    pub main_address: String,
    pub detail_address: Option<String>,
    pub label: Option<String>,
    pub note: RequestNote,
    pub is_default: bool,
    /// Previously-default address whose flag must be cleared before insert.
    pub clear_default: Option<Uuid>,
}

/// Validate the fetched lines against the balance; returns the order total.
pub fn check_order(lines: &[PricedCartLine], balance: i64) -> Result<i64> {
    if lines.is_empty() {
        return Err(Error::NotFound("cart lines not found".into()));
    }
    let total = order_total(lines);
    if balance < total {
        return Err(Error::InsufficientFunds);
    }
    Ok(total)
}

/// Decide whether to reuse the default address's delivery or create a new
/// address + delivery pair from the override payload.
///
/// The override counts as present only when all four required fields are
/// supplied; a partial override is rejected, never merged with the default.
pub fn resolve_delivery(addresses: &[Address], req: &OrderCartRequest) -> Result<DeliveryPlan> {
    let default_address = addresses.iter().find(|a| a.is_default);
    let override_absent = req.recipient.is_none()
        && req.contact_primary.is_none()
        && req.postal_code.is_none()
        && req.main_address.is_none();

    if let (Some(default), true) = (default_address, override_absent) {
        return Ok(DeliveryPlan::Reuse { address_id: default.id });
    }

    let (Some(recipient), Some(contact_primary), Some(postal_code), Some(main_address)) = (
        req.recipient.clone(),
        req.contact_primary.clone(),
        req.postal_code.clone(),
        req.main_address.clone(),
    ) else {
        return Err(Error::InvalidInput(
            "new delivery requires recipient, postal code, main address, contact".into(),
        ));
    };

    if addresses.len() >= MAX_ADDRESSES_PER_USER {
        return Err(Error::InvalidInput("maximum 5 addresses".into()));
    }

    let note = match req.request_type {
        Some(request_type) => RequestNote::derive(request_type, req.custom_request.as_deref()),
        None => RequestNote::Custom(req.custom_request.clone().unwrap_or_default()),
    };

    Ok(DeliveryPlan::Create(NewDelivery {
        recipient,
        contact_primary,
        contact_secondary: req.contact_secondary.clone(),
        postal_code,
        main_address,
        detail_address: req.detail_address.clone(),
        label: req.label.clone(),
        note,
        is_default: req.is_default,
        clear_default: if req.is_default { default_address.map(|a| a.id) } else { None },
    }))
}

// =============================================================================
// Workflow
// =============================================================================

pub async fn place_order(
    db: &PgPool,
    nats: &Option<async_nats::Client>,
    user_id: Uuid,
    cart_ids: &[Uuid],
    req: OrderCartRequest,
) -> Result<PlacedOrder> {
    let mut tx = db.begin().await?;

    let balance = ledger::lock_balance(&mut *tx, user_id).await?;
    let lines = fetch_lines(&mut *tx, user_id, cart_ids).await?;
    let total = check_order(&lines, balance.amount)?;

    let addresses =
        sqlx::query_as::<_, Address>("SELECT * FROM addresses WHERE user_id = $1 ORDER BY created_at")
            .bind(user_id)
            .fetch_all(&mut *tx)
            .await?;
    let delivery_id = match resolve_delivery(&addresses, &req)? {
        DeliveryPlan::Reuse { address_id } => delivery_for_address(&mut *tx, address_id).await?,
        DeliveryPlan::Create(new) => create_delivery(&mut *tx, user_id, new).await?,
    };

    let mut order_ids = Vec::with_capacity(lines.len());
    for line in &lines {
        let order_id = Uuid::now_v7();
        sqlx::query("INSERT INTO orders (id, cart_id, delivery_id, count) VALUES ($1, $2, $3, $4)")
            .bind(order_id)
            .bind(line.id)
            .bind(delivery_id)
            .bind(line.count)
            .execute(&mut *tx)
            .await?;
        ledger::decrement_stock(&mut *tx, line.product_option_id, line.count).await?;
        sqlx::query("UPDATE carts SET is_deleted = TRUE, updated_at = NOW() WHERE id = $1")
            .bind(line.id)
            .execute(&mut *tx)
            .await?;
        order_ids.push(order_id);
    }
    ledger::debit_balance(&mut *tx, user_id, total).await?;

    tx.commit().await?;

    events::publish(
        nats,
        &DomainEvent::OrderPlaced {
            user_id,
            order_ids: order_ids.clone(),
            delivery_id,
            total,
        },
    )
    .await;

    Ok(PlacedOrder { order_ids, delivery_id, total })
}

/// Fetch the requested lines with their option prices, locking the cart and
/// option rows for the rest of the transaction. Processing order follows
/// fetch order (creation time) so repeated placements are deterministic.
async fn fetch_lines(
    conn: &mut PgConnection,
    user_id: Uuid,
    cart_ids: &[Uuid],
) -> Result<Vec<PricedCartLine>> {
    Ok(sqlx::query_as::<_, PricedCartLine>(
        "SELECT c.id, c.product_option_id, p.name AS product_name, o.name AS option_name, \
                o.price, c.count \
         FROM carts c \
         JOIN product_options o ON o.id = c.product_option_id \
         JOIN products p ON p.id = o.product_id \
         WHERE c.id = ANY($1) AND c.user_id = $2 AND NOT c.is_deleted \
         ORDER BY c.created_at \
         FOR UPDATE OF c, o",
    )
    .bind(cart_ids)
    .bind(user_id)
    .fetch_all(&mut *conn)
    .await?)
}

async fn delivery_for_address(conn: &mut PgConnection, address_id: Uuid) -> Result<Uuid> {
    let delivery = sqlx::query_as::<_, Delivery>(
        "SELECT * FROM deliveries WHERE address_id = $1 ORDER BY created_at DESC LIMIT 1",
    )
    .bind(address_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| Error::NotFound("delivery for default address not found".into()))?;
    Ok(delivery.id)
}

async fn create_delivery(conn: &mut PgConnection, user_id: Uuid, new: NewDelivery) -> Result<Uuid> {
    let NewDelivery {
        recipient,
        contact_primary,
        contact_secondary,
        postal_code,
        main_address,
        detail_address,
        label,
        note,
        is_default,
        clear_default,
    } = new;

    if let Some(prior) = clear_default {
        sqlx::query("UPDATE addresses SET is_default = FALSE WHERE id = $1")
            .bind(prior)
            .execute(&mut *conn)
            .await?;
    }

    let address_id = Uuid::now_v7();
    sqlx::query(
        "INSERT INTO addresses (id, user_id, main_address, detail_address, postal_code, \
                                is_default, is_order_origin) \
         VALUES ($1, $2, $3, $4, $5, $6, TRUE)",
    )
    .bind(address_id)
    .bind(user_id)
    .bind(&main_address)
    .bind(&detail_address)
    .bind(&postal_code)
    .bind(is_default)
    .execute(&mut *conn)
    .await?;

    let delivery_id = Uuid::now_v7();
    sqlx::query(
        "INSERT INTO deliveries (id, address_id, label, recipient, contact_primary, \
                                 contact_secondary, request_note) \
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(delivery_id)
    .bind(address_id)
    .bind(&label)
    .bind(&recipient)
    .bind(&contact_primary)
    .bind(&contact_secondary)
    .bind(note.into_text())
    .execute(&mut *conn)
    .await?;

    Ok(delivery_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

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

    fn address(is_default: bool) -> Address {
        Address {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            main_address: "1 Main St".into(),
            detail_address: None,
            postal_code: "04524".into(),
            is_default,
            is_order_origin: false,
            created_at: Utc::now(),
        }
    }

    fn full_override() -> OrderCartRequest {
        OrderCartRequest {
            recipient: Some("Kim".into()),
            contact_primary: Some("010-1234-5678".into()),
            postal_code: Some("04524".into()),
            main_address: Some("1 Main St".into()),
            request_type: Some(RequestType::LeaveAtDoor),
            ..Default::default()
        }
    }

    #[test]
    fn test_check_order_total() {
        assert_eq!(check_order(&[line(30, 2)], 100).unwrap(), 60);
    }

    #[test]
    fn test_check_order_insufficient_funds() {
        assert!(matches!(check_order(&[line(30, 2)], 50), Err(Error::InsufficientFunds)));
    }

    #[test]
    fn test_check_order_no_lines() {
        assert!(matches!(check_order(&[], 100), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_reuse_default_without_override() {
        let addresses = vec![address(true), address(false)];
        let plan = resolve_delivery(&addresses, &OrderCartRequest::default()).unwrap();
        assert_eq!(plan, DeliveryPlan::Reuse { address_id: addresses[0].id });
    }

    #[test]
    fn test_partial_override_rejected_despite_default() {
        let addresses = vec![address(true)];
        let req = OrderCartRequest { recipient: Some("Kim".into()), ..Default::default() };
        assert!(matches!(resolve_delivery(&addresses, &req), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_missing_fields_without_default() {
        assert!(matches!(
            resolve_delivery(&[], &OrderCartRequest::default()),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_create_with_full_override() {
        let plan = resolve_delivery(&[], &full_override()).unwrap();
        let DeliveryPlan::Create(new) = plan else { panic!("expected create plan") };
        assert_eq!(new.recipient, "Kim");
        assert_eq!(new.note, RequestNote::Fixed("Leave the package at the door"));
        assert!(!new.is_default);
        assert_eq!(new.clear_default, None);
    }

    #[test]
    fn test_address_limit() {
        let five: Vec<Address> = (0..5).map(|_| address(false)).collect();
        assert!(matches!(
            resolve_delivery(&five, &full_override()),
            Err(Error::InvalidInput(_))
        ));
        let four: Vec<Address> = (0..4).map(|_| address(false)).collect();
        assert!(matches!(
            resolve_delivery(&four, &full_override()),
            Ok(DeliveryPlan::Create(_))
        ));
    }

    #[test]
    fn test_new_default_clears_prior() {
        let addresses = vec![address(true)];
        let req = OrderCartRequest { is_default: true, ..full_override() };
        let DeliveryPlan::Create(new) = resolve_delivery(&addresses, &req).unwrap() else {
            panic!("expected create plan")
        };
        assert!(new.is_default);
        assert_eq!(new.clear_default, Some(addresses[0].id));
    }

    #[test]
    fn test_custom_request_note() {
        let req = OrderCartRequest {
            request_type: Some(RequestType::CustomInput),
            custom_request: Some("ring twice".into()),
            ..full_override()
        };
        let DeliveryPlan::Create(new) = resolve_delivery(&[], &req).unwrap() else {
            panic!("expected create plan")
        };
        assert_eq!(new.note, RequestNote::Custom("ring twice".into()));
    }
}
