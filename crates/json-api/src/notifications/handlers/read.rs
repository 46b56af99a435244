//! Mark Notification Read Handler

use dukkan_app::domain::notifications::models::NotificationUuid;
use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    notifications::{errors::into_status_error, models::NotificationResponse},
};

/// Mark Notification Read Handler
#[endpoint(
    tags("notifications"),
    summary = "Mark Notification Read",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Notification marked read"),
        (status_code = StatusCode::NOT_FOUND, description = "Notification not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    notification: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<NotificationResponse>, StatusError> {
    let principal = depot.principal_or_401()?;

    let notification = depot
        .app()?
        .notifications
        .mark_read(
            principal.user_uuid,
            NotificationUuid::from_uuid(notification.into_inner()),
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(notification.into()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use dukkan_app::domain::notifications::{MockNotificationsService, NotificationsServiceError};
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{app_context, customer_service};

    use super::{super::tests::make_notification, *};

    fn make_service(notifications: MockNotificationsService) -> Service {
        let mut app = app_context();

        app.notifications = Arc::new(notifications);

        customer_service(app, Router::with_path("notifications/{notification}/read").put(handler))
    }

    #[tokio::test]
    async fn test_marks_notification_read() -> TestResult {
        let uuid = NotificationUuid::new();

        let mut notifications = MockNotificationsService::new();

        notifications
            .expect_mark_read()
            .once()
            .withf(move |_, u| *u == uuid)
            .return_once(move |_, _| {
                let mut notification = make_notification(uuid);
                notification.read_at = Some(Timestamp::UNIX_EPOCH);

                Ok(notification)
            });

        let url = format!("http://example.com/notifications/{uuid}/read");

        let body: NotificationResponse = TestClient::put(url)
            .send(&make_service(notifications))
            .await
            .take_json()
            .await?;

        assert!(body.read_at.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn test_someone_elses_notification_returns_404() -> TestResult {
        let mut notifications = MockNotificationsService::new();

        notifications
            .expect_mark_read()
            .once()
            .return_once(|_, _| Err(NotificationsServiceError::NotFound));

        let url = format!("http://example.com/notifications/{}/read", Uuid::now_v7());

        let res = TestClient::put(url)
            .send(&make_service(notifications))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
