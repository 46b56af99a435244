//! Order Models

use dukkan::{
    carts::CartLine,
    orders::OrderStatus,
    payments::{PaymentMethod, PaymentStatus},
    shipping::ShippingType,
};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    auth::UserUuid,
    domain::addresses::models::{AddressFields, AddressUuid},
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<Order>;

/// Gateway-side payment state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDetails {
    pub status: PaymentStatus,
    pub invoice_id: Option<String>,
    pub payment_url: Option<String>,
    pub transaction_id: Option<String>,
    pub paid_at: Option<Timestamp>,
    pub refund_id: Option<String>,
    pub refunded_at: Option<Timestamp>,
}

impl PaymentDetails {
    #[must_use]
    pub fn pending() -> Self {
        Self {
            status: PaymentStatus::Pending,
            invoice_id: None,
            payment_url: None,
            transaction_id: None,
            paid_at: None,
            refund_id: None,
            refunded_at: None,
        }
    }
}

/// Order Model. Monetary fields are frozen at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub uuid: OrderUuid,
    pub user_uuid: UserUuid,
    pub lines: Vec<CartLine>,
    pub address: AddressFields,
    pub payment_method: PaymentMethod,
    pub payment: PaymentDetails,
    pub shipping_type: Option<ShippingType>,
    pub shipping_cost: u64,
    pub coupon_code: Option<String>,
    pub coupon_message: Option<String>,
    pub discount_value: u64,
    pub subtotal: u64,
    pub total: u64,
    pub has_free_shipping: bool,
    pub status: OrderStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// What the caller asks to check out with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub address_uuid: AddressUuid,
    pub payment_method: PaymentMethod,
    pub shipping_type: Option<ShippingType>,
    pub coupon_code: Option<String>,
}

/// Inputs for a totals preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalsRequest {
    pub city: String,
    pub shipping_type: Option<ShippingType>,
    pub coupon_code: Option<String>,
}

/// Payment fields changed by a gateway report or refund.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PaymentUpdate {
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    pub transaction_id: Option<String>,
    pub paid_at: Option<Timestamp>,
    pub refund_id: Option<String>,
    pub refunded_at: Option<Timestamp>,
}
