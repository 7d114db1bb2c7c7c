//! Domain events published to NATS

use serde::Serialize;
use uuid::Uuid;

pub const ORDER_PLACED_SUBJECT: &str = "orders.placed";

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    OrderPlaced {
        user_id: Uuid,
        order_ids: Vec<Uuid>,
        delivery_id: Uuid,
        total: i64,
    },
}

impl DomainEvent {
    fn subject(&self) -> &'static str {
        match self {
            Self::OrderPlaced { .. } => ORDER_PLACED_SUBJECT,
        }
    }
}

/// Fire-and-forget publish; a missing or failing broker never fails the
/// request that raised the event.
pub async fn publish(nats: &Option<async_nats::Client>, event: &DomainEvent) {
    let Some(client) = nats else { return };
    match serde_json::to_vec(event) {
        Ok(payload) => {
            if let Err(e) = client.publish(event.subject().to_string(), payload.into()).await {
                tracing::warn!(error = %e, "failed to publish domain event");
            }
        }
        Err(e) => tracing::warn!(error = %e, "failed to serialize domain event"),
    }
}
