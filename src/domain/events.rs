use std::fmt;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use super::order::{OrderStatus, OrderView};

/// Topic carrying every order lifecycle event.
pub const ORDER_EVENTS_TOPIC: &str = "order-events";
/// Message header holding the event type.
pub const EVENT_TYPE_HEADER: &str = "eventType";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderEventType {
    OrderCreated,
    OrderPaid,
    OrderCancelled,
    /// Anything this build does not know about; kept verbatim.
    Other(String),
}

impl OrderEventType {
    pub fn as_str(&self) -> &str {
        match self {
            OrderEventType::OrderCreated => "ORDER_CREATED",
            OrderEventType::OrderPaid => "ORDER_PAID",
            OrderEventType::OrderCancelled => "ORDER_CANCELLED",
            OrderEventType::Other(raw) => raw,
        }
    }

    /// The event emitted when an order moves into `status`.
    pub fn for_status(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Pending => OrderEventType::OrderCreated,
            OrderStatus::Paid => OrderEventType::OrderPaid,
            OrderStatus::Cancelled => OrderEventType::OrderCancelled,
        }
    }
}

impl From<String> for OrderEventType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "ORDER_CREATED" => OrderEventType::OrderCreated,
            "ORDER_PAID" => OrderEventType::OrderPaid,
            "ORDER_CANCELLED" => OrderEventType::OrderCancelled,
            _ => OrderEventType::Other(raw),
        }
    }
}

impl fmt::Display for OrderEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for OrderEventType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OrderEventType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(OrderEventType::from)
    }
}

/// Wire message for an order state change. Not persisted; `event_id` is
/// unique per emission and only used for tracing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderEvent {
    pub event_id: Uuid,
    pub event_type: OrderEventType,
    pub timestamp: DateTime<Utc>,
    pub order_id: Uuid,
    pub user_id: Uuid,
    #[serde(serialize_with = "super::serialize_amount")]
    pub total_amount: BigDecimal,
}

impl OrderEvent {
    pub fn new(event_type: OrderEventType, order: &OrderView) -> Self {
        OrderEvent {
            event_id: Uuid::new_v4(),
            event_type,
            timestamp: Utc::now(),
            order_id: order.id,
            user_id: order.user_id,
            total_amount: order.total_amount.clone(),
        }
    }
}
