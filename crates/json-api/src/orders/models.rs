//! Order request and response models.

use dukkan::{orders::OrderStatus, payments::PaymentMethod, shipping::ShippingType};
use dukkan_app::domain::{
    addresses::models::AddressUuid,
    orders::models::{CheckoutRequest, Order},
};
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{addresses::AddressBody, carts::LineResponse};

/// Checkout Request
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub(crate) struct CheckoutBody {
    /// Saved address to deliver to
    pub address_uuid: Uuid,

    /// `visa` or `cod`
    #[salvo(schema(value_type = String))]
    pub payment_method: PaymentMethod,

    /// `standard`, `express` or `same_day`
    #[salvo(schema(value_type = Option<String>))]
    pub shipping_type: Option<ShippingType>,

    #[validate(length(min = 1, max = 40))]
    pub coupon_code: Option<String>,
}

impl From<CheckoutBody> for CheckoutRequest {
    fn from(body: CheckoutBody) -> Self {
        CheckoutRequest {
            address_uuid: AddressUuid::from_uuid(body.address_uuid),
            payment_method: body.payment_method,
            shipping_type: body.shipping_type,
            coupon_code: body.coupon_code,
        }
    }
}

/// Change Order Status Request
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct ChangeStatusRequest {
    /// Target status, e.g. `confirmed` or `out_for_delivery`
    #[salvo(schema(value_type = String))]
    pub status: OrderStatus,
}

/// Payment state of an order.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PaymentResponse {
    pub status: String,

    pub invoice_id: Option<String>,

    /// Hosted payment page for card orders
    pub payment_url: Option<String>,

    pub transaction_id: Option<String>,

    pub paid_at: Option<String>,

    pub refund_id: Option<String>,

    pub refunded_at: Option<String>,
}

/// Order Response
///
/// Amounts are in fils and frozen at checkout.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    pub uuid: Uuid,

    pub status: String,

    pub items: Vec<LineResponse>,

    pub address: AddressBody,

    pub payment_method: String,

    pub payment: PaymentResponse,

    pub shipping_type: Option<String>,

    pub shipping_cost: u64,

    pub coupon_code: Option<String>,

    pub coupon_message: Option<String>,

    pub discount_value: u64,

    pub subtotal: u64,

    pub total: u64,

    pub has_free_shipping: bool,

    pub created_at: String,

    pub updated_at: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        let payment = order.payment;

        Self {
            uuid: order.uuid.into_uuid(),
            status: order.status.as_str().to_owned(),
            items: order.lines.into_iter().map(LineResponse::from).collect(),
            address: order.address.into(),
            payment_method: order.payment_method.as_str().to_owned(),
            payment: PaymentResponse {
                status: payment.status.as_str().to_owned(),
                invoice_id: payment.invoice_id,
                payment_url: payment.payment_url,
                transaction_id: payment.transaction_id,
                paid_at: payment.paid_at.map(|at| at.to_string()),
                refund_id: payment.refund_id,
                refunded_at: payment.refunded_at.map(|at| at.to_string()),
            },
            shipping_type: order.shipping_type.map(|kind| kind.as_str().to_owned()),
            shipping_cost: order.shipping_cost,
            coupon_code: order.coupon_code,
            coupon_message: order.coupon_message,
            discount_value: order.discount_value,
            subtotal: order.subtotal,
            total: order.total,
            has_free_shipping: order.has_free_shipping,
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        }
    }
}
