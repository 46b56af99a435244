//! List Notifications Handler

use salvo::prelude::*;

use crate::{
    extensions::*,
    notifications::{errors::into_status_error, models::NotificationResponse},
};

/// List Notifications Handler
///
/// The caller's latest notifications, newest first.
#[endpoint(
    tags("notifications"),
    summary = "List Notifications",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Notification list"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    depot: &mut Depot,
) -> Result<Json<Vec<NotificationResponse>>, StatusError> {
    let principal = depot.principal_or_401()?;

    let notifications = depot
        .app()?
        .notifications
        .list_notifications(principal.user_uuid)
        .await
        .map_err(into_status_error)?;

    Ok(Json(notifications.into_iter().map(NotificationResponse::from).collect()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use dukkan_app::domain::notifications::{MockNotificationsService, models::NotificationUuid};
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{TEST_USER_UUID, app_context, customer_service};

    use super::{super::tests::make_notification, *};

    #[tokio::test]
    async fn test_lists_callers_notifications() -> TestResult {
        let uuid = NotificationUuid::new();

        let mut notifications = MockNotificationsService::new();

        notifications
            .expect_list_notifications()
            .once()
            .withf(|user| *user == TEST_USER_UUID)
            .return_once(move |_| Ok(vec![make_notification(uuid)]));

        let mut app = app_context();
        app.notifications = Arc::new(notifications);

        let body: Vec<NotificationResponse> = TestClient::get("http://example.com/notifications")
            .send(&customer_service(app, Router::with_path("notifications").get(handler)))
            .await
            .take_json()
            .await?;

        assert_eq!(body.len(), 1);
        assert_eq!(body[0].kind, "order_status");
        assert!(body[0].read_at.is_none());

        Ok(())
    }
}
