//! Payment response models.

use dukkan_app::domain::{orders::models::Order, payments::GatewayPaymentMethod};
use rust_decimal::Decimal;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payment Method Response
///
/// Gateway amounts are in major currency units.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PaymentMethodResponse {
    pub id: i64,

    pub code: String,

    pub name: String,

    #[salvo(schema(value_type = String))]
    pub service_charge: Decimal,

    #[salvo(schema(value_type = String))]
    pub total_amount: Decimal,

    pub currency: String,
}

impl From<GatewayPaymentMethod> for PaymentMethodResponse {
    fn from(method: GatewayPaymentMethod) -> Self {
        Self {
            id: method.id,
            code: method.code,
            name: method.name,
            service_charge: method.service_charge,
            total_amount: method.total_amount,
            currency: method.currency,
        }
    }
}

/// Webhook Acknowledgement
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct WebhookResponse {
    /// Order the event referred to; absent for events that are not status changes
    pub order_uuid: Option<Uuid>,

    /// Payment status after the event
    pub payment_status: Option<String>,
}

impl From<Option<Order>> for WebhookResponse {
    fn from(order: Option<Order>) -> Self {
        order.map_or_else(Self::default, |order| Self {
            order_uuid: Some(order.uuid.into_uuid()),
            payment_status: Some(order.payment.status.as_str().to_owned()),
        })
    }
}
