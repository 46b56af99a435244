//! Notifications service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    auth::UserUuid,
    database::Db,
    domain::notifications::{
        errors::NotificationsServiceError,
        models::{NewNotification, Notification, NotificationUuid},
        repository::PgNotificationsRepository,
    },
};

/// Most recent notifications returned by a listing.
const LIST_LIMIT: i64 = 100;

#[derive(Debug, Clone)]
pub struct PgNotificationsService {
    db: Db,
    repository: PgNotificationsRepository,
}

impl PgNotificationsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgNotificationsRepository::new(),
        }
    }
}

#[async_trait]
impl NotificationsService for PgNotificationsService {
    async fn create_notification(
        &self,
        notification: NewNotification,
    ) -> Result<Notification, NotificationsServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_notification(&mut tx, &notification)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn list_notifications(
        &self,
        user: UserUuid,
    ) -> Result<Vec<Notification>, NotificationsServiceError> {
        let mut tx = self.db.begin().await?;

        let notifications = self
            .repository
            .list_notifications(&mut tx, user, LIST_LIMIT)
            .await?;

        tx.commit().await?;

        Ok(notifications)
    }

    async fn mark_read(
        &self,
        user: UserUuid,
        notification: NotificationUuid,
    ) -> Result<Notification, NotificationsServiceError> {
        let mut tx = self.db.begin().await?;

        let updated = self.repository.mark_read(&mut tx, user, notification).await?;

        tx.commit().await?;

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait NotificationsService: Send + Sync {
    /// Persist a notification.
    async fn create_notification(
        &self,
        notification: NewNotification,
    ) -> Result<Notification, NotificationsServiceError>;

    /// The recipient's latest notifications, newest first.
    async fn list_notifications(
        &self,
        user: UserUuid,
    ) -> Result<Vec<Notification>, NotificationsServiceError>;

    /// Mark one of the recipient's notifications as read.
    async fn mark_read(
        &self,
        user: UserUuid,
        notification: NotificationUuid,
    ) -> Result<Notification, NotificationsServiceError>;
}
