//! Payments
//!
//! Gateway-reported statuses and refunds drive two coupled states: the
//! payment status and the order status. Transitions are checked against the
//! current state so replayed callbacks and webhooks are no-ops.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    offers::UnknownVariant,
    orders::{OrderStatus, TransitionError},
};

/// Payment lifecycle on our side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Initiated, or cash on delivery not yet collected
    Pending,

    /// Captured
    Paid,

    /// Declined or abandoned
    Failed,

    /// Returned to the customer
    Refunded,
}

impl PaymentStatus {
    /// Storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "failed" => Ok(Self::Failed),
            "refunded" => Ok(Self::Refunded),
            other => Err(UnknownVariant::new("payment status", other)),
        }
    }
}

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Card through the payment gateway
    Visa,

    /// Cash on delivery
    Cod,
}

impl PaymentMethod {
    /// Storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Visa => "visa",
            Self::Cod => "cod",
        }
    }

    /// Whether checkout goes through the gateway.
    pub const fn uses_gateway(self) -> bool {
        matches!(self, Self::Visa)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "visa" => Ok(Self::Visa),
            "cod" => Ok(Self::Cod),
            other => Err(UnknownVariant::new("payment method", other)),
        }
    }
}

/// Authoritative status reported by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayStatus {
    /// Money captured
    Paid,

    /// Payment failed or was cancelled
    Failed,

    /// Still in progress
    Pending,
}

/// Side effect to run after a transition commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Tell the customer the payment went through
    NotifyPaid,

    /// Tell the customer the payment failed
    NotifyFailed,

    /// Tell the customer the refund was issued
    NotifyRefunded,
}

/// New state pair plus its side effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Next payment status
    pub payment_status: PaymentStatus,

    /// Next order status
    pub order_status: OrderStatus,

    /// Follow-up to run once persisted
    pub effect: Effect,
}

/// Outcome of applying a gateway report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// State changes; persist it and run the effect
    Applied(Transition),

    /// Already in that state, or a stale report; change nothing
    Unchanged,
}

/// Apply a gateway status report to the current state.
///
/// `Paid` moves a pending or failed payment to paid and confirms an order
/// that is still pending or failed. `Failed` only affects a pending payment
/// and fails the order if it is still pending. Anything else, including a
/// repeated report, is [`TransitionOutcome::Unchanged`].
pub fn apply_gateway_status(
    payment_status: PaymentStatus,
    order_status: OrderStatus,
    reported: GatewayStatus,
) -> TransitionOutcome {
    match (reported, payment_status) {
        (GatewayStatus::Paid, PaymentStatus::Pending | PaymentStatus::Failed) => {
            let order_status = match order_status {
                OrderStatus::Pending | OrderStatus::Failed => OrderStatus::Confirmed,
                other => other,
            };

            TransitionOutcome::Applied(Transition {
                payment_status: PaymentStatus::Paid,
                order_status,
                effect: Effect::NotifyPaid,
            })
        }
        (GatewayStatus::Failed, PaymentStatus::Pending) => {
            let order_status = match order_status {
                OrderStatus::Pending => OrderStatus::Failed,
                other => other,
            };

            TransitionOutcome::Applied(Transition {
                payment_status: PaymentStatus::Failed,
                order_status,
                effect: Effect::NotifyFailed,
            })
        }
        (GatewayStatus::Paid, PaymentStatus::Paid | PaymentStatus::Refunded)
        | (
            GatewayStatus::Failed,
            PaymentStatus::Paid | PaymentStatus::Failed | PaymentStatus::Refunded,
        )
        | (GatewayStatus::Pending, _) => TransitionOutcome::Unchanged,
    }
}

/// Validate a refund and compute the resulting state.
///
/// # Errors
///
/// Returns [`TransitionError::NotRefundable`] unless the payment is paid.
pub fn apply_refund(payment_status: PaymentStatus) -> Result<Transition, TransitionError> {
    if payment_status != PaymentStatus::Paid {
        return Err(TransitionError::NotRefundable {
            status: payment_status,
        });
    }

    Ok(Transition {
        payment_status: PaymentStatus::Refunded,
        order_status: OrderStatus::Refunded,
        effect: Effect::NotifyRefunded,
    })
}
