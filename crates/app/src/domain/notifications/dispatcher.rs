//! Notification dispatcher.

use std::{fmt, sync::Arc};

use tracing::{debug, error};

use crate::domain::notifications::{
    models::NewNotification, presence::PresenceRegistry, service::NotificationsService,
};

/// Stores a notification and pushes it to the recipient's live stream.
///
/// Delivery never fails the caller: errors are logged and dropped.
#[derive(Clone)]
pub struct NotificationDispatcher {
    store: Arc<dyn NotificationsService>,
    presence: Arc<dyn PresenceRegistry>,
}

impl NotificationDispatcher {
    #[must_use]
    pub fn new(store: Arc<dyn NotificationsService>, presence: Arc<dyn PresenceRegistry>) -> Self {
        Self { store, presence }
    }

    #[tracing::instrument(
        name = "notifications.dispatcher.send",
        skip(self, notification),
        fields(user_uuid = %notification.user_uuid, kind = %notification.kind)
    )]
    pub async fn send(&self, notification: NewNotification) {
        let stored = match self.store.create_notification(notification).await {
            Ok(stored) => stored,
            Err(error) => {
                error!(%error, "failed to store notification");
                return;
            }
        };

        let user = stored.user_uuid;

        let Some(connection) = self.presence.lookup(user) else {
            return;
        };

        if !connection.deliver(stored) {
            debug!("live stream closed, dropping connection");
            self.presence.unregister(user, connection.id());
        }
    }
}

impl fmt::Debug for NotificationDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationDispatcher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use mockall::predicate::eq;
    use testresult::TestResult;

    use crate::{
        auth::UserUuid,
        domain::notifications::{
            ConnectionHandle, MockNotificationsService, MockPresenceRegistry,
            NotificationsServiceError,
            models::{Notification, NotificationKind, NotificationUuid},
        },
    };

    use super::*;

    fn new_notification(user: UserUuid) -> NewNotification {
        NewNotification {
            user_uuid: user,
            title: "Order update".to_owned(),
            body: "Your order is now delivered.".to_owned(),
            kind: NotificationKind::OrderStatus,
            order_uuid: None,
        }
    }

    fn stored(notification: NewNotification) -> Notification {
        Notification {
            uuid: NotificationUuid::new(),
            user_uuid: notification.user_uuid,
            title: notification.title,
            body: notification.body,
            kind: notification.kind,
            order_uuid: notification.order_uuid,
            created_at: Timestamp::UNIX_EPOCH,
            read_at: None,
        }
    }

    #[tokio::test]
    async fn pushes_to_live_connection() -> TestResult {
        let user = UserUuid::new();
        let (handle, mut receiver) = ConnectionHandle::open();

        let mut store = MockNotificationsService::new();
        store
            .expect_create_notification()
            .once()
            .returning(|notification| Ok(stored(notification)));

        let mut presence = MockPresenceRegistry::new();
        presence
            .expect_lookup()
            .with(eq(user))
            .once()
            .returning(move |_| Some(handle.clone()));
        presence.expect_unregister().never();

        let dispatcher = NotificationDispatcher::new(Arc::new(store), Arc::new(presence));

        dispatcher.send(new_notification(user)).await;

        let pushed = receiver.try_recv()?;

        assert_eq!(pushed.user_uuid, user);

        Ok(())
    }

    #[tokio::test]
    async fn store_failure_skips_push() {
        let mut store = MockNotificationsService::new();
        store
            .expect_create_notification()
            .once()
            .returning(|_| Err(NotificationsServiceError::Timeout));

        let mut presence = MockPresenceRegistry::new();
        presence.expect_lookup().never();

        let dispatcher = NotificationDispatcher::new(Arc::new(store), Arc::new(presence));

        dispatcher.send(new_notification(UserUuid::new())).await;
    }

    #[tokio::test]
    async fn closed_stream_is_unregistered() {
        let user = UserUuid::new();
        let (handle, receiver) = ConnectionHandle::open();
        let connection = handle.id();

        drop(receiver);

        let mut store = MockNotificationsService::new();
        store
            .expect_create_notification()
            .once()
            .returning(|notification| Ok(stored(notification)));

        let mut presence = MockPresenceRegistry::new();
        presence
            .expect_lookup()
            .once()
            .returning(move |_| Some(handle.clone()));
        presence
            .expect_unregister()
            .with(eq(user), eq(connection))
            .once()
            .return_const(());

        let dispatcher = NotificationDispatcher::new(Arc::new(store), Arc::new(presence));

        dispatcher.send(new_notification(user)).await;
    }
}
