//! Notification response models.

use dukkan_app::domain::notifications::models::Notification;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Notification Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct NotificationResponse {
    pub uuid: Uuid,

    pub title: String,

    pub body: String,

    /// `order_status`, `payment` or `promotion`
    pub kind: String,

    pub order_uuid: Option<Uuid>,

    pub created_at: String,

    pub read_at: Option<String>,
}

impl From<Notification> for NotificationResponse {
    fn from(notification: Notification) -> Self {
        Self {
            uuid: notification.uuid.into_uuid(),
            title: notification.title,
            body: notification.body,
            kind: notification.kind.as_str().to_owned(),
            order_uuid: notification.order_uuid.map(|uuid| uuid.into_uuid()),
            created_at: notification.created_at.to_string(),
            read_at: notification.read_at.map(|at| at.to_string()),
        }
    }
}
