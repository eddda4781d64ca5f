use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::events::OrderEvent;
use crate::domain::notification::{NewNotification, Notification};
use crate::domain::ports::{EventHandler, NotificationRepository};

use super::run_blocking;

pub struct NotificationService {
    repo: Arc<dyn NotificationRepository>,
}

impl NotificationService {
    pub fn new(repo: Arc<dyn NotificationRepository>) -> Self {
        Self { repo }
    }

    /// Decode one order event and store the matching notification.
    pub async fn handle_payload(&self, payload: &[u8]) -> Result<Notification, DomainError> {
        let event: OrderEvent = serde_json::from_slice(payload)
            .map_err(|e| DomainError::Validation(format!("malformed order event: {}", e)))?;
        log::debug!(
            "Received {} for order {} (event {})",
            event.event_type,
            event.order_id,
            event.event_id
        );

        let notification = NewNotification::from_event(&event);
        let repo = self.repo.clone();
        run_blocking(move || repo.create(notification)).await
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>, DomainError> {
        let repo = self.repo.clone();
        run_blocking(move || repo.list_for_user(user_id)).await
    }
}

#[async_trait]
impl EventHandler for NotificationService {
    async fn handle(&self, payload: &[u8]) {
        match self.handle_payload(payload).await {
            Ok(n) => log::info!(
                "Stored {} notification {} for user {}",
                n.notification_type,
                n.id,
                n.user_id
            ),
            Err(e) => log::error!("Dropping order event: {}", e),
        }
    }
}
