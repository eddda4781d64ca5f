use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::notification::{NewNotification, Notification};
use crate::domain::ports::NotificationRepository;
use crate::schema::notifications;

use super::models::{NewNotificationRow, NotificationRow};

pub struct DieselNotificationRepository {
    pool: DbPool,
}

impl DieselNotificationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl NotificationRepository for DieselNotificationRepository {
    fn create(&self, notification: NewNotification) -> Result<Notification, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(notifications::table)
            .values(&NewNotificationRow {
                id: Uuid::new_v4(),
                user_id: notification.user_id,
                notification_type: notification.notification_type,
                message: notification.message,
            })
            .returning(NotificationRow::as_returning())
            .get_result(&mut conn)?;
        Ok(row.into())
    }

    fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = notifications::table
            .filter(notifications::user_id.eq(user_id))
            .select(NotificationRow::as_select())
            .order(notifications::created_at.desc())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(Notification::from).collect())
    }
}
