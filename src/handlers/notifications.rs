use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::notification_service::NotificationService;
use crate::auth::AuthenticatedUser;
use crate::domain::notification::Notification;
use crate::errors::{AppError, ErrorResponse};

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/notifications", web::get().to(list_notifications));
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    /// The order event type that produced it, e.g. ORDER_PAID.
    #[serde(rename = "type")]
    pub notification_type: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationResponse {
    fn from(n: Notification) -> Self {
        NotificationResponse {
            id: n.id,
            user_id: n.user_id,
            notification_type: n.notification_type,
            message: n.message,
            created_at: n.created_at,
        }
    }
}

/// GET /api/notifications
#[utoipa::path(
    get,
    path = "/api/notifications",
    responses(
        (status = 200, description = "The caller's notifications, newest first", body = [NotificationResponse]),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    ),
    tag = "notifications"
)]
pub async fn list_notifications(
    service: web::Data<NotificationService>,
    caller: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let notifications: Vec<NotificationResponse> = service
        .list_for_user(caller.user_id)
        .await?
        .into_iter()
        .map(NotificationResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(notifications))
}
