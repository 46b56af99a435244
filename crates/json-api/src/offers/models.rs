//! Offer request and response models.

use decimal_percentage::Percentage;
use dukkan::{
    money::from_points,
    offers::{DiscountValue, Offer, OfferKind, OfferTarget, TargetType},
};
use dukkan_app::domain::offers::models::OfferDetails;
use jiff::Timestamp;
use rust_decimal::Decimal;
use salvo::{oapi::ToSchema, prelude::StatusError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Discount rule of an offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub(crate) enum OfferType {
    Percentage,
    Fixed,
    BuyXGetY,
    FreeShipping,
    CartDiscount,
    Coupon,
}

/// Offer Request
///
/// Which of the rule fields are read depends on `offer_type`:
/// `percent` for percentage and coupon offers, `amount` for fixed offers,
/// `buy` and `get` for buy-x-get-y, `min_cart_value` for free shipping, and
/// either `percent` or `amount` plus an optional `min_cart_value` for cart
/// discounts.
#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub(crate) struct OfferRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    pub offer_type: OfferType,

    #[salvo(schema(value_type = Option<String>))]
    pub percent: Option<Decimal>,

    /// Fils
    pub amount: Option<u64>,

    pub buy: Option<u32>,

    pub get: Option<u32>,

    /// Fils
    pub min_cart_value: Option<u64>,

    #[validate(length(min = 3, max = 40))]
    pub coupon_code: Option<String>,

    /// `product`, `category`, `subcategory`, `sub_subcategory`, `cart` or `order`
    #[salvo(schema(value_type = String))]
    pub target_type: TargetType,

    #[serde(default)]
    pub target_uuids: Vec<Uuid>,

    #[salvo(schema(value_type = String))]
    pub starts_at: Timestamp,

    #[salvo(schema(value_type = String))]
    pub ends_at: Timestamp,

    #[serde(default = "enabled")]
    pub is_active: bool,

    #[serde(default)]
    pub priority: i32,
}

const fn enabled() -> bool {
    true
}

impl OfferRequest {
    /// Assemble the discount rule and the editable fields.
    pub(crate) fn into_details(self) -> Result<OfferDetails, StatusError> {
        let kind = self.kind()?;

        Ok(OfferDetails {
            name: self.name,
            kind,
            coupon_code: self.coupon_code,
            target: OfferTarget {
                target_type: self.target_type,
                uuids: self.target_uuids,
            },
            starts_at: self.starts_at,
            ends_at: self.ends_at,
            is_active: self.is_active,
            priority: self.priority,
        })
    }

    fn kind(&self) -> Result<OfferKind, StatusError> {
        let kind = match self.offer_type {
            OfferType::Percentage => OfferKind::Percentage {
                percent: percent(self.percent)?,
            },
            OfferType::Fixed => OfferKind::Fixed {
                amount: required(self.amount, "amount")?,
            },
            OfferType::BuyXGetY => OfferKind::BuyXGetY {
                buy: required(self.buy, "buy")?,
                get: required(self.get, "get")?,
            },
            OfferType::FreeShipping => OfferKind::FreeShipping {
                min_cart_value: self.min_cart_value,
            },
            OfferType::CartDiscount => OfferKind::CartDiscount {
                value: match (self.percent, self.amount) {
                    (Some(value), None) => DiscountValue::Percent {
                        percent: percent(Some(value))?,
                    },
                    (None, Some(amount)) => DiscountValue::Amount { amount },
                    _ => {
                        return Err(StatusError::bad_request()
                            .brief("cart discounts take exactly one of percent or amount"));
                    }
                },
                min_cart_value: self.min_cart_value,
            },
            OfferType::Coupon => OfferKind::Coupon {
                percent: percent(self.percent)?,
            },
        };

        Ok(kind)
    }
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, StatusError> {
    value.ok_or_else(|| StatusError::bad_request().brief(format!("{field} is required")))
}

/// Percentage points in `(0, 100]`.
fn percent(value: Option<Decimal>) -> Result<Percentage, StatusError> {
    let points = required(value, "percent")?;

    if points <= Decimal::ZERO || points > Decimal::ONE_HUNDRED {
        return Err(StatusError::bad_request().brief("percent must be above 0 and at most 100"));
    }

    Ok(from_points(points))
}

/// Offer Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OfferResponse {
    pub uuid: Uuid,

    pub name: String,

    /// Discount rule, tagged by `offer_type`
    #[salvo(schema(value_type = Object))]
    pub kind: OfferKind,

    pub coupon_code: Option<String>,

    pub target_type: String,

    pub target_uuids: Vec<Uuid>,

    pub starts_at: String,

    pub ends_at: String,

    pub is_active: bool,

    pub priority: i32,

    pub created_at: String,
}

impl From<Offer> for OfferResponse {
    fn from(offer: Offer) -> Self {
        Self {
            uuid: offer.uuid,
            name: offer.name,
            kind: offer.kind,
            coupon_code: offer.coupon_code,
            target_type: offer.target.target_type.as_str().to_owned(),
            target_uuids: offer.target.uuids,
            starts_at: offer.starts_at.to_string(),
            ends_at: offer.ends_at.to_string(),
            is_active: offer.is_active,
            priority: offer.priority,
            created_at: offer.created_at.to_string(),
        }
    }
}
