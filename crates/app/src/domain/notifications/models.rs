//! Notification Models

use std::{fmt, str::FromStr};

use dukkan::{orders::OrderStatus, payments::Effect};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{auth::UserUuid, domain::orders::models::OrderUuid, uuids::TypedUuid};

/// Notification UUID
pub type NotificationUuid = TypedUuid<Notification>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    OrderStatus,
    Payment,
    Promotion,
}

impl NotificationKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OrderStatus => "order_status",
            Self::Payment => "payment",
            Self::Promotion => "promotion",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown notification kind: {0}")]
pub struct UnknownNotificationKind(String);

impl FromStr for NotificationKind {
    type Err = UnknownNotificationKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "order_status" => Ok(Self::OrderStatus),
            "payment" => Ok(Self::Payment),
            "promotion" => Ok(Self::Promotion),
            other => Err(UnknownNotificationKind(other.to_owned())),
        }
    }
}

/// Notification Model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub uuid: NotificationUuid,
    pub user_uuid: UserUuid,
    pub title: String,
    pub body: String,
    pub kind: NotificationKind,
    pub order_uuid: Option<OrderUuid>,
    pub created_at: Timestamp,
    pub read_at: Option<Timestamp>,
}

/// New Notification Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub user_uuid: UserUuid,
    pub title: String,
    pub body: String,
    pub kind: NotificationKind,
    pub order_uuid: Option<OrderUuid>,
}

impl NewNotification {
    /// Message for a payment state change.
    #[must_use]
    pub fn payment(user_uuid: UserUuid, order_uuid: OrderUuid, effect: Effect) -> Self {
        let (title, body) = match effect {
            Effect::NotifyPaid => (
                "Payment received",
                "Your payment was successful and your order is confirmed.",
            ),
            Effect::NotifyFailed => (
                "Payment failed",
                "We could not process your payment. Please try again.",
            ),
            Effect::NotifyRefunded => (
                "Refund issued",
                "Your payment has been refunded.",
            ),
        };

        Self {
            user_uuid,
            title: title.to_owned(),
            body: body.to_owned(),
            kind: NotificationKind::Payment,
            order_uuid: Some(order_uuid),
        }
    }

    /// Message for an order status change.
    #[must_use]
    pub fn order_status(user_uuid: UserUuid, order_uuid: OrderUuid, status: OrderStatus) -> Self {
        let label = status.as_str().replace('_', " ");

        Self {
            user_uuid,
            title: "Order update".to_owned(),
            body: format!("Your order is now {label}."),
            kind: NotificationKind::OrderStatus,
            order_uuid: Some(order_uuid),
        }
    }
}
