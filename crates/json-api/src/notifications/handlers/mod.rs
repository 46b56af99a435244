//! Notification Handlers

pub(crate) mod index;
pub(crate) mod read;
pub(crate) mod stream;

#[cfg(test)]
mod tests {
    use dukkan_app::domain::notifications::models::{
        Notification, NotificationKind, NotificationUuid,
    };
    use jiff::Timestamp;

    use crate::test_helpers::TEST_USER_UUID;

    pub(super) fn make_notification(uuid: NotificationUuid) -> Notification {
        Notification {
            uuid,
            user_uuid: TEST_USER_UUID,
            title: "Order confirmed".to_owned(),
            body: "Your order is confirmed".to_owned(),
            kind: NotificationKind::OrderStatus,
            order_uuid: None,
            created_at: Timestamp::UNIX_EPOCH,
            read_at: None,
        }
    }
}
