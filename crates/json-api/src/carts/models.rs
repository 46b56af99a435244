//! Cart request and response models.

use dukkan::{
    carts::{CartLine, LineAttributes},
    offers::OfferSnapshot,
    orders::OrderTotals,
    shipping::ShippingType,
};
use dukkan_app::domain::{
    carts::models::{Cart, NewCartItem},
    orders::models::TotalsRequest,
    products::models::ProductUuid,
};
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Priced cart or order line.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LineResponse {
    pub uuid: Uuid,

    pub product_uuid: Uuid,

    pub color: Option<String>,

    pub size: Option<String>,

    pub material: Option<String>,

    pub quantity: u32,

    /// Unit price in fils
    pub price: u64,

    /// Unit price in fils after the applied offer
    pub price_after_offer: u64,

    /// Amount charged for the line, in fils
    pub line_total: u64,

    #[salvo(schema(value_type = Object))]
    pub applied_offer: Option<OfferSnapshot>,

    /// Matching offers whose window has not opened yet
    #[salvo(schema(value_type = Vec<Object>))]
    pub upcoming_offers: Vec<OfferSnapshot>,
}

impl From<CartLine> for LineResponse {
    fn from(line: CartLine) -> Self {
        let LineAttributes {
            color,
            size,
            material,
        } = line.attributes;

        Self {
            uuid: line.uuid,
            product_uuid: line.product_uuid,
            color,
            size,
            material,
            quantity: line.quantity,
            price: line.price,
            price_after_offer: line.price_after_offer,
            line_total: line.line_total,
            applied_offer: line.applied_offer,
            upcoming_offers: line.upcoming_offers.into_vec(),
        }
    }
}

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    pub uuid: Uuid,

    pub items: Vec<LineResponse>,

    /// Lines dropped on this read because the product is gone or sold out
    pub removed_items: Vec<LineResponse>,

    /// Fils
    pub total_cart_price: u64,

    /// Fils
    pub total_price_after_discount: u64,

    pub has_free_shipping: bool,

    #[salvo(schema(value_type = Vec<Object>))]
    pub applied_offers: Vec<OfferSnapshot>,

    pub version: i64,

    pub updated_at: String,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        Self {
            uuid: cart.uuid.into_uuid(),
            items: cart.lines.into_iter().map(LineResponse::from).collect(),
            removed_items: cart.pruned.into_iter().map(LineResponse::from).collect(),
            total_cart_price: cart.totals.total_cart_price,
            total_price_after_discount: cart.totals.total_price_after_discount,
            has_free_shipping: cart.totals.has_free_shipping,
            applied_offers: cart.applied_offers,
            version: cart.version,
            updated_at: cart.updated_at.to_string(),
        }
    }
}

/// Add Cart Item Request
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub(crate) struct AddItemRequest {
    pub product_uuid: Uuid,

    pub color: Option<String>,

    pub size: Option<String>,

    pub material: Option<String>,

    #[validate(range(min = 1))]
    pub quantity: u32,
}

impl From<AddItemRequest> for NewCartItem {
    fn from(request: AddItemRequest) -> Self {
        NewCartItem {
            product_uuid: ProductUuid::from_uuid(request.product_uuid),
            attributes: LineAttributes {
                color: request.color,
                size: request.size,
                material: request.material,
            },
            quantity: request.quantity,
        }
    }
}

/// Update Cart Item Request
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub(crate) struct UpdateItemRequest {
    #[validate(range(min = 1))]
    pub quantity: u32,
}

/// Cart Totals Request
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub(crate) struct CartTotalsRequest {
    /// Delivery city, used to look up shipping options
    #[validate(length(min = 1))]
    pub city: String,

    /// `standard`, `express` or `same_day`
    #[salvo(schema(value_type = Option<String>))]
    pub shipping_type: Option<ShippingType>,

    pub coupon_code: Option<String>,
}

impl From<CartTotalsRequest> for TotalsRequest {
    fn from(request: CartTotalsRequest) -> Self {
        TotalsRequest {
            city: request.city,
            shipping_type: request.shipping_type,
            coupon_code: request.coupon_code,
        }
    }
}

/// Cart Totals Response
///
/// Amounts are in fils.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartTotalsResponse {
    pub subtotal: u64,

    /// Automatic cart-wide discount
    pub cart_discount: u64,

    /// Cart discount plus coupon discount
    pub discount_value: u64,

    pub total_after_discount: u64,

    pub shipping_cost: u64,

    pub total: u64,

    pub has_free_shipping: bool,

    pub shipping_type: Option<String>,

    /// Verdict on the supplied coupon code
    pub coupon_message: Option<String>,
}

impl From<OrderTotals> for CartTotalsResponse {
    fn from(totals: OrderTotals) -> Self {
        Self {
            coupon_message: totals.coupon_message(),
            subtotal: totals.subtotal,
            cart_discount: totals.cart_discount,
            discount_value: totals.discount_value,
            total_after_discount: totals.total_after_discount,
            shipping_cost: totals.shipping_cost,
            total: totals.total,
            has_free_shipping: totals.has_free_shipping,
            shipping_type: totals.shipping_type.map(|kind| kind.as_str().to_owned()),
        }
    }
}
