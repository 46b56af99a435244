//! Cart Models

use dukkan::{
    carts::{CartLine, CartTotals, LineAttributes},
    offers::OfferSnapshot,
};
use jiff::Timestamp;
use serde::Serialize;

use crate::{auth::UserUuid, domain::products::models::ProductUuid, uuids::TypedUuid};

/// Cart UUID
pub type CartUuid = TypedUuid<Cart>;

/// Cart Model, always freshly repriced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cart {
    pub uuid: CartUuid,
    pub user_uuid: UserUuid,
    pub lines: Vec<CartLine>,
    /// Lines dropped by this refresh because their product is gone or sold out.
    pub pruned: Vec<CartLine>,
    #[serde(flatten)]
    pub totals: CartTotals,
    pub applied_offers: Vec<OfferSnapshot>,
    pub version: i64,
    pub updated_at: Timestamp,
}

/// New Cart Item Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCartItem {
    pub product_uuid: ProductUuid,
    pub attributes: LineAttributes,
    pub quantity: u32,
}
