//! Orders
//!
//! Order lifecycle states and the admin-facing transition table. Payment
//! driven transitions live in [`crate::payments`].

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::offers::UnknownVariant;

pub mod totals;

pub use totals::*;

/// Order Status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Awaiting payment or confirmation
    Pending,

    /// Accepted
    Confirmed,

    /// Being packed
    InPreparation,

    /// With the courier
    OutForDelivery,

    /// Handed over
    Delivered,

    /// Cancelled by the customer
    CancelledByUser,

    /// Rejected by the store
    Rejected,

    /// Sent back after delivery
    Returned,

    /// Money returned
    Refunded,

    /// Courier could not deliver
    DeliveryFailed,

    /// Payment failed
    Failed,
}

impl OrderStatus {
    /// Storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::InPreparation => "in_preparation",
            Self::OutForDelivery => "out_for_delivery",
            Self::Delivered => "delivered",
            Self::CancelledByUser => "cancelled_by_user",
            Self::Rejected => "rejected",
            Self::Returned => "returned",
            Self::Refunded => "refunded",
            Self::DeliveryFailed => "delivery_failed",
            Self::Failed => "failed",
        }
    }

    /// Statuses an admin may move this order to.
    ///
    /// `Refunded` is only reachable through a refund.
    pub const fn next_statuses(self) -> &'static [OrderStatus] {
        match self {
            Self::Pending => &[
                Self::Confirmed,
                Self::CancelledByUser,
                Self::Rejected,
                Self::Failed,
            ],
            Self::Confirmed => &[
                Self::InPreparation,
                Self::CancelledByUser,
                Self::Rejected,
                Self::Failed,
            ],
            Self::InPreparation => &[Self::OutForDelivery, Self::Rejected],
            Self::OutForDelivery => &[Self::Delivered, Self::DeliveryFailed],
            Self::DeliveryFailed => &[Self::OutForDelivery, Self::Returned],
            Self::Delivered => &[Self::Returned],
            Self::CancelledByUser
            | Self::Rejected
            | Self::Returned
            | Self::Refunded
            | Self::Failed => &[],
        }
    }

    /// Whether an admin may move from `self` to `next`.
    pub fn can_transition_to(self, next: Self) -> bool {
        self.next_statuses().contains(&next)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "in_preparation" => Ok(Self::InPreparation),
            "out_for_delivery" => Ok(Self::OutForDelivery),
            "delivered" => Ok(Self::Delivered),
            "cancelled_by_user" => Ok(Self::CancelledByUser),
            "rejected" => Ok(Self::Rejected),
            "returned" => Ok(Self::Returned),
            "refunded" => Ok(Self::Refunded),
            "delivery_failed" => Ok(Self::DeliveryFailed),
            "failed" => Ok(Self::Failed),
            other => Err(UnknownVariant::new("order status", other)),
        }
    }
}

/// Rejected state change.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    /// Not allowed by the order status table.
    #[error("order cannot move from {from} to {to}")]
    InvalidStatusChange {
        /// Current status
        from: OrderStatus,

        /// Requested status
        to: OrderStatus,
    },

    /// Refunds need a paid payment.
    #[error("payment is {status}, only paid payments can be refunded")]
    NotRefundable {
        /// Current payment status
        status: crate::payments::PaymentStatus,
    },
}

/// Validate an admin status change.
///
/// # Errors
///
/// Returns [`TransitionError::InvalidStatusChange`] when the table forbids it.
pub fn change_order_status(
    current: OrderStatus,
    next: OrderStatus,
) -> Result<OrderStatus, TransitionError> {
    if current.can_transition_to(next) {
        Ok(next)
    } else {
        Err(TransitionError::InvalidStatusChange {
            from: current,
            to: next,
        })
    }
}
