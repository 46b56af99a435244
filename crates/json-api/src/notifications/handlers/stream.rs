//! Notification Stream Handler

use std::{convert::Infallible, sync::Arc};

use dukkan_app::{
    auth::UserUuid,
    domain::notifications::{ConnectionHandle, PresenceRegistry, models::Notification},
};
use futures::{Stream, stream};
use salvo::{
    prelude::*,
    sse::{SseEvent, SseKeepAlive},
};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{extensions::*, notifications::models::NotificationResponse};

const EVENT_NAME: &str = "notification";

/// A live stream. Leaves the presence registry when dropped.
struct Subscription {
    presence: Arc<dyn PresenceRegistry>,
    user: UserUuid,
    connection: Uuid,
    receiver: UnboundedReceiver<Notification>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.presence.unregister(self.user, self.connection);

        debug!(user_uuid = %self.user, connection = %self.connection, "notification stream closed");
    }
}

fn subscribe(
    presence: Arc<dyn PresenceRegistry>,
    user: UserUuid,
) -> impl Stream<Item = Result<SseEvent, Infallible>> + Send + 'static {
    let (handle, receiver) = ConnectionHandle::open();
    let connection = handle.id();

    presence.register(user, handle);

    let subscription = Subscription {
        presence,
        user,
        connection,
        receiver,
    };

    stream::unfold(subscription, |mut subscription| async move {
        loop {
            let notification = subscription.receiver.recv().await?;
            let id = notification.uuid.to_string();

            match serde_json::to_string(&NotificationResponse::from(notification)) {
                Ok(data) => {
                    let event = SseEvent::default().name(EVENT_NAME).id(id).text(data);

                    return Some((Ok(event), subscription));
                }
                Err(source) => {
                    warn!(notification_uuid = %id, "failed to encode notification: {source}");
                }
            }
        }
    })
}

/// Notification Stream Handler
///
/// Server-sent events, one `notification` event per new notification for
/// the caller. A newer stream for the same user replaces this one.
#[endpoint(
    tags("notifications"),
    summary = "Stream Notifications",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Event stream"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot, res: &mut Response) -> Result<(), StatusError> {
    let principal = depot.principal_or_401()?;
    let presence = Arc::clone(&depot.app()?.presence);

    debug!(user_uuid = %principal.user_uuid, "notification stream opened");

    SseKeepAlive::new(subscribe(presence, principal.user_uuid)).stream(res);

    Ok(())
}

#[cfg(test)]
mod tests {
    use dukkan_app::domain::notifications::{InMemoryPresenceRegistry, models::NotificationUuid};
    use futures::StreamExt;
    use salvo::test::TestClient;
    use testresult::TestResult;

    use crate::test_helpers::{TEST_USER_UUID, app_context, service_with};

    use super::{super::tests::make_notification, *};

    #[tokio::test]
    async fn test_delivered_notification_becomes_event() -> TestResult {
        let presence: Arc<dyn PresenceRegistry> = Arc::new(InMemoryPresenceRegistry::new());

        let mut events = Box::pin(subscribe(Arc::clone(&presence), TEST_USER_UUID));

        let delivered = presence
            .lookup(TEST_USER_UUID)
            .is_some_and(|handle| handle.deliver(make_notification(NotificationUuid::new())));

        assert!(delivered, "stream should be registered");
        assert!(matches!(events.next().await, Some(Ok(_))));

        Ok(())
    }

    #[tokio::test]
    async fn test_dropping_stream_unregisters() -> TestResult {
        let presence: Arc<dyn PresenceRegistry> = Arc::new(InMemoryPresenceRegistry::new());

        let events = subscribe(Arc::clone(&presence), TEST_USER_UUID);

        assert!(presence.lookup(TEST_USER_UUID).is_some());

        drop(events);

        assert!(presence.lookup(TEST_USER_UUID).is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_anonymous_caller_gets_401() -> TestResult {
        let res = TestClient::get("http://example.com/notifications/stream")
            .send(&service_with(
                app_context(),
                Router::with_path("notifications/stream").get(handler),
            ))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }
}
