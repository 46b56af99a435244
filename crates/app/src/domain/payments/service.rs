//! Payments service.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use dukkan::payments::{
    GatewayStatus, PaymentStatus, Transition, TransitionOutcome, apply_gateway_status,
    apply_refund,
};
use jiff::Timestamp;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::{
    database::Db,
    domain::{
        notifications::{NotificationDispatcher, models::NewNotification},
        orders::{
            models::{Order, OrderUuid, PaymentUpdate},
            repository::PgOrdersRepository,
        },
        payments::{
            GatewayPaymentMethod, PaymentGateway, PaymentKey, RefundRequest,
            errors::PaymentsServiceError, parse_event, verify_signature,
        },
    },
};

/// Which redirect the customer came back through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackKind {
    Success,
    Error,
}

/// A status report ready to apply to an order.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Report {
    invoice_id: String,
    status: GatewayStatus,
    transaction_id: Option<String>,
}

/// Returning through the error page means the attempt is over, so a
/// still-pending payment counts as failed.
fn callback_status(kind: CallbackKind, reported: GatewayStatus) -> GatewayStatus {
    match (kind, reported) {
        (CallbackKind::Error, GatewayStatus::Pending) => GatewayStatus::Failed,
        (_, status) => status,
    }
}

fn payment_update(transition: Transition, report: &Report, now: Timestamp) -> PaymentUpdate {
    PaymentUpdate {
        payment_status: transition.payment_status,
        order_status: transition.order_status,
        transaction_id: report.transaction_id.clone(),
        paid_at: (transition.payment_status == PaymentStatus::Paid).then_some(now),
        refund_id: None,
        refunded_at: None,
    }
}

#[derive(Clone)]
pub struct PgPaymentsService {
    db: Db,
    orders: PgOrdersRepository,
    gateway: Arc<dyn PaymentGateway>,
    dispatcher: NotificationDispatcher,
    webhook_secret: Zeroizing<String>,
}

impl PgPaymentsService {
    #[must_use]
    pub fn new(
        db: Db,
        gateway: Arc<dyn PaymentGateway>,
        dispatcher: NotificationDispatcher,
        webhook_secret: Zeroizing<String>,
    ) -> Self {
        Self {
            db,
            orders: PgOrdersRepository::new(),
            gateway,
            dispatcher,
            webhook_secret,
        }
    }

    /// Apply a report under the order's row lock, then notify.
    async fn apply_report(
        &self,
        report: &Report,
        now: Timestamp,
    ) -> Result<Order, PaymentsServiceError> {
        let mut tx = self.db.begin().await?;

        let order = self
            .orders
            .lock_order_by_invoice(&mut tx, &report.invoice_id)
            .await?;

        let outcome = apply_gateway_status(order.payment.status, order.status, report.status);

        let TransitionOutcome::Applied(transition) = outcome else {
            tx.commit().await?;

            info!(
                order_uuid = %order.uuid,
                payment_status = %order.payment.status,
                reported = ?report.status,
                "payment report changed nothing"
            );

            return Ok(order);
        };

        let updated = self
            .write_transition(&mut tx, order.uuid, &payment_update(transition, report, now))
            .await?;

        tx.commit().await?;

        info!(
            order_uuid = %updated.uuid,
            from = %order.payment.status,
            to = %updated.payment.status,
            "applied payment report"
        );

        self.dispatcher
            .send(NewNotification::payment(
                updated.user_uuid,
                updated.uuid,
                transition.effect,
            ))
            .await;

        Ok(updated)
    }

    async fn write_transition(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        update: &PaymentUpdate,
    ) -> Result<Order, PaymentsServiceError> {
        Ok(self.orders.update_payment(tx, order, update).await?)
    }
}

impl fmt::Debug for PgPaymentsService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgPaymentsService")
            .field("webhook_secret", &"**redacted**")
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl PaymentsService for PgPaymentsService {
    async fn payment_methods(
        &self,
        amount: u64,
    ) -> Result<Vec<GatewayPaymentMethod>, PaymentsServiceError> {
        Ok(self.gateway.initiate(amount).await?)
    }

    #[tracing::instrument(name = "payments.service.handle_callback", skip(self), err)]
    async fn handle_callback(
        &self,
        payment_id: &str,
        kind: CallbackKind,
        now: Timestamp,
    ) -> Result<Order, PaymentsServiceError> {
        let payment = self
            .gateway
            .get_status(&PaymentKey::PaymentId(payment_id.to_owned()))
            .await?;

        let report = Report {
            invoice_id: payment.invoice_id,
            status: callback_status(kind, payment.status),
            transaction_id: payment.transaction_id,
        };

        self.apply_report(&report, now).await
    }

    #[tracing::instrument(name = "payments.service.handle_webhook", skip_all, err)]
    async fn handle_webhook(
        &self,
        body: &[u8],
        signature: &str,
        now: Timestamp,
    ) -> Result<Option<Order>, PaymentsServiceError> {
        verify_signature(self.webhook_secret.as_bytes(), body, signature)?;

        let event = match parse_event(body) {
            Ok(Some(event)) => event,
            Ok(None) => {
                info!("ignoring webhook event");
                return Ok(None);
            }
            Err(error) => {
                warn!(%error, "ignoring unreadable webhook payload");
                return Ok(None);
            }
        };

        let report = Report {
            invoice_id: event.invoice_id,
            status: event.status,
            transaction_id: event.transaction_id,
        };

        match self.apply_report(&report, now).await {
            Ok(order) => Ok(Some(order)),
            Err(PaymentsServiceError::NotFound) => {
                warn!(invoice_id = %report.invoice_id, "ignoring webhook for unknown invoice");
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }

    #[tracing::instrument(
        name = "payments.service.refund",
        skip(self),
        fields(order_uuid = %order),
        err
    )]
    async fn refund(
        &self,
        order: OrderUuid,
        now: Timestamp,
    ) -> Result<Order, PaymentsServiceError> {
        let mut tx = self.db.begin().await?;

        let current = self.orders.lock_order(&mut tx, order).await?;

        let transition = apply_refund(current.payment.status)?;

        let Some(invoice_id) = current.payment.invoice_id.clone() else {
            warn!("paid order has no invoice to refund");
            return Err(PaymentsServiceError::MissingInvoice);
        };

        let receipt = self
            .gateway
            .refund(&RefundRequest {
                invoice_id,
                amount: current.total,
                comment: format!("Refund for order {}", current.uuid),
            })
            .await?;

        let update = PaymentUpdate {
            payment_status: transition.payment_status,
            order_status: transition.order_status,
            transaction_id: None,
            paid_at: None,
            refund_id: Some(receipt.refund_id),
            refunded_at: Some(now),
        };

        let updated = self.write_transition(&mut tx, order, &update).await?;

        tx.commit().await?;

        info!(total = updated.total, "refunded order");

        self.dispatcher
            .send(NewNotification::payment(
                updated.user_uuid,
                updated.uuid,
                transition.effect,
            ))
            .await;

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait PaymentsService: Send + Sync {
    /// Ways to pay `amount` fils offered by the gateway.
    ///
    /// # Errors
    ///
    /// Returns an error when the gateway fails.
    async fn payment_methods(
        &self,
        amount: u64,
    ) -> Result<Vec<GatewayPaymentMethod>, PaymentsServiceError>;

    /// Query the gateway for a payment the customer returned from and apply
    /// its status.
    ///
    /// # Errors
    ///
    /// Returns an error when the gateway fails or no order has the invoice.
    async fn handle_callback(
        &self,
        payment_id: &str,
        kind: CallbackKind,
        now: Timestamp,
    ) -> Result<Order, PaymentsServiceError>;

    /// Verify and apply a webhook delivery. Repeated deliveries change
    /// nothing. Once the signature checks out, events that are not status
    /// changes, unreadable payloads and unknown invoices yield `None`.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentsServiceError::InvalidSignature`] when the signature
    /// does not match, or an error when the order cannot be updated.
    async fn handle_webhook(
        &self,
        body: &[u8],
        signature: &str,
        now: Timestamp,
    ) -> Result<Option<Order>, PaymentsServiceError>;

    /// Refund a paid order in full.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentsServiceError::Conflict`] unless the payment is paid.
    async fn refund(&self, order: OrderUuid, now: Timestamp) -> Result<Order, PaymentsServiceError>;
}
