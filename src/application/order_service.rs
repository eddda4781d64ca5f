use std::sync::Arc;

use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::events::{OrderEvent, OrderEventType};
use crate::domain::order::{
    distinct_product_ids, price_order, validate_items, OrderItemRequest, OrderStatus, OrderView,
};
use crate::domain::ports::{EventPublisher, OrderRepository, ProductRepository};

use super::run_blocking;

pub struct OrderService {
    products: Arc<dyn ProductRepository>,
    orders: Arc<dyn OrderRepository>,
    publisher: Arc<dyn EventPublisher>,
}

impl OrderService {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        orders: Arc<dyn OrderRepository>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            products,
            orders,
            publisher,
        }
    }

    /// Price the requested lines against the current ACTIVE catalog, persist
    /// the order with all of its lines, then announce it.
    pub async fn create_order(
        &self,
        user_id: Uuid,
        items: Vec<OrderItemRequest>,
    ) -> Result<OrderView, DomainError> {
        validate_items(&items)?;

        let ids = distinct_product_ids(&items);
        let products = self.products.clone();
        let active = run_blocking(move || products.find_active_by_ids(&ids)).await?;

        let priced = price_order(&items, &active)?;

        let orders = self.orders.clone();
        let order = run_blocking(move || orders.create(user_id, priced.total_amount, priced.lines))
            .await?;

        log::info!("Order {} created for user {}", order.id, user_id);
        self.publish(OrderEventType::OrderCreated, &order).await;
        Ok(order)
    }

    pub async fn list_orders(&self, user_id: Uuid) -> Result<Vec<OrderView>, DomainError> {
        let orders = self.orders.clone();
        run_blocking(move || orders.list_for_user(user_id)).await
    }

    /// Another user's order is reported exactly like a missing one.
    pub async fn get_order(&self, order_id: Uuid, user_id: Uuid) -> Result<OrderView, DomainError> {
        let orders = self.orders.clone();
        run_blocking(move || orders.find_for_user(order_id, user_id))
            .await?
            .ok_or_else(|| DomainError::not_found_id("Order", order_id))
    }

    /// Set the status without checking the current one; any order the caller
    /// owns can move to PAID or CANCELLED from any state.
    pub async fn update_status(
        &self,
        order_id: Uuid,
        user_id: Uuid,
        status: OrderStatus,
    ) -> Result<OrderView, DomainError> {
        self.get_order(order_id, user_id).await?;

        let orders = self.orders.clone();
        let order = run_blocking(move || orders.update_status(order_id, status))
            .await?
            .ok_or_else(|| DomainError::not_found_id("Order", order_id))?;

        log::info!("Order {} is now {}", order.id, order.status);
        self.publish(OrderEventType::for_status(status), &order)
            .await;
        Ok(order)
    }

    async fn publish(&self, event_type: OrderEventType, order: &OrderView) {
        let event = OrderEvent::new(event_type, order);
        if let Err(e) = self.publisher.publish(&event).await {
            log::error!(
                "Failed to publish {} for order {}: {}",
                event.event_type,
                order.id,
                e
            );
        }
    }
}
