use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::events::{OrderEvent, OrderEventType};
use super::format_amount;

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub notification_type: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: Uuid,
    pub notification_type: String,
    pub message: String,
}

impl NewNotification {
    /// The notification addressed to the event's user.
    pub fn from_event(event: &OrderEvent) -> Self {
        NewNotification {
            user_id: event.user_id,
            notification_type: event.event_type.as_str().to_string(),
            message: render_message(event),
        }
    }
}

pub fn render_message(event: &OrderEvent) -> String {
    match &event.event_type {
        OrderEventType::OrderCreated => format!(
            "Your order #{} has been created. Total amount: ${}",
            event.order_id,
            format_amount(&event.total_amount)
        ),
        OrderEventType::OrderPaid => format!(
            "Payment confirmed for order #{}. Thank you for your purchase!",
            event.order_id
        ),
        OrderEventType::OrderCancelled => {
            format!("Your order #{} has been cancelled.", event.order_id)
        }
        OrderEventType::Other(raw) => format!("Order #{} update: {}", event.order_id, raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use std::str::FromStr;

    fn event(event_type: OrderEventType, total: &str) -> OrderEvent {
        OrderEvent {
            event_id: Uuid::new_v4(),
            event_type,
            timestamp: Utc::now(),
            order_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            total_amount: BigDecimal::from_str(total).unwrap(),
        }
    }

    #[test]
    fn created_message_includes_total_with_two_decimals() {
        let e = event(OrderEventType::OrderCreated, "100");
        let message = render_message(&e);
        assert!(message.contains("$100.00"), "{}", message);
        assert!(message.contains(&e.order_id.to_string()));
    }

    #[test]
    fn paid_and_cancelled_messages() {
        let paid = render_message(&event(OrderEventType::OrderPaid, "1"));
        assert!(paid.starts_with("Payment confirmed for order #"));

        let cancelled = render_message(&event(OrderEventType::OrderCancelled, "1"));
        assert!(cancelled.ends_with("has been cancelled."));
    }

    #[test]
    fn unknown_type_falls_back_to_raw_type() {
        let e = event(OrderEventType::Other("ORDER_SHIPPED".to_string()), "1");
        assert_eq!(
            render_message(&e),
            format!("Order #{} update: ORDER_SHIPPED", e.order_id)
        );
    }

    #[test]
    fn from_event_targets_event_user() {
        let e = event(OrderEventType::OrderPaid, "5");
        let n = NewNotification::from_event(&e);
        assert_eq!(n.user_id, e.user_id);
        assert_eq!(n.notification_type, "ORDER_PAID");
    }
}
