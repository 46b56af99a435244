//! Offers
//!
//! An offer is a time-boxed discount rule. Line-level offers (percentage,
//! fixed, buy-X-get-Y, free shipping) attach to products through one of the
//! four catalog scopes. Cart-level offers target the cart or order as a whole,
//! and coupons are looked up by code at checkout.

use std::{cmp::Ordering, fmt, str::FromStr};

use decimal_percentage::Percentage;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;
use uuid::Uuid;

use crate::products::ProductTargets;

/// Upcoming offers for a single line. Rarely more than a couple.
pub type UpcomingOffers = SmallVec<[OfferSnapshot; 2]>;

/// What an offer's `target_uuids` refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    /// Individual products
    Product,

    /// Subcategories
    Subcategory,

    /// Sub-subcategories
    SubSubcategory,

    /// Top-level categories
    Category,

    /// The whole cart
    Cart,

    /// The whole order
    Order,
}

impl TargetType {
    /// Storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Subcategory => "subcategory",
            Self::SubSubcategory => "sub_subcategory",
            Self::Category => "category",
            Self::Cart => "cart",
            Self::Order => "order",
        }
    }

    /// Whether the target is the cart or order rather than catalog entities.
    pub const fn is_cart_level(self) -> bool {
        matches!(self, Self::Cart | Self::Order)
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown enum label read from storage or input.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    /// Which enum was being parsed
    pub kind: &'static str,

    /// The rejected value
    pub value: String,
}

impl UnknownVariant {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

impl FromStr for TargetType {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "product" => Ok(Self::Product),
            "subcategory" => Ok(Self::Subcategory),
            "sub_subcategory" => Ok(Self::SubSubcategory),
            "category" => Ok(Self::Category),
            "cart" => Ok(Self::Cart),
            "order" => Ok(Self::Order),
            other => Err(UnknownVariant::new("target type", other)),
        }
    }
}

/// A cart-wide discount value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiscountValue {
    /// Percentage of the subtotal
    Percent {
        /// Share of the subtotal, exchanged as percentage points
        #[serde(with = "crate::money::points")]
        percent: Percentage,
    },

    /// Fixed amount in fils
    Amount {
        /// Fils off
        amount: u64,
    },
}

/// Discount rule carried by an offer, one variant per offer type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "offer_type", rename_all = "snake_case")]
pub enum OfferKind {
    /// `percent` off the unit price
    Percentage {
        /// Share of the unit price, exchanged as percentage points
        #[serde(with = "crate::money::points")]
        percent: Percentage,
    },

    /// Fixed fils off the unit price
    Fixed {
        /// Fils off per unit
        amount: u64,
    },

    /// Buy `buy` units, get `get` more free
    BuyXGetY {
        /// Units that must be paid for
        buy: u32,

        /// Units given free per group
        get: u32,
    },

    /// Waives shipping
    FreeShipping {
        /// Minimum discounted subtotal, when set
        min_cart_value: Option<u64>,
    },

    /// Discount on the whole cart
    CartDiscount {
        /// Discount value
        value: DiscountValue,

        /// Minimum subtotal, when set
        min_cart_value: Option<u64>,
    },

    /// Percentage coupon redeemed by code
    Coupon {
        /// Percentage points, or a fraction when below one point
        #[serde(with = "crate::money::points")]
        percent: Percentage,
    },
}

impl OfferKind {
    /// Storage label matching the serde tag.
    pub const fn offer_type(&self) -> &'static str {
        match self {
            Self::Percentage { .. } => "percentage",
            Self::Fixed { .. } => "fixed",
            Self::BuyXGetY { .. } => "buy_x_get_y",
            Self::FreeShipping { .. } => "free_shipping",
            Self::CartDiscount { .. } => "cart_discount",
            Self::Coupon { .. } => "coupon",
        }
    }

    /// Kinds that price a single cart line.
    pub const fn is_line_level(&self) -> bool {
        matches!(
            self,
            Self::Percentage { .. }
                | Self::Fixed { .. }
                | Self::BuyXGetY { .. }
                | Self::FreeShipping { .. }
        )
    }

    /// Kinds that may be redeemed with a coupon code.
    pub const fn is_redeemable_as_coupon(&self) -> bool {
        matches!(
            self,
            Self::Coupon { .. } | Self::Percentage { .. } | Self::Fixed { .. }
        )
    }
}

/// What an offer applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferTarget {
    /// Kind of entity referenced
    pub target_type: TargetType,

    /// Referenced entities; empty for cart/order targets
    pub uuids: Vec<Uuid>,
}

impl OfferTarget {
    /// Target the whole cart.
    pub fn cart() -> Self {
        Self {
            target_type: TargetType::Cart,
            uuids: Vec::new(),
        }
    }

    fn contains(&self, uuid: &Uuid) -> bool {
        self.uuids.contains(uuid)
    }
}

/// Where an offer stands relative to a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    /// Enabled and inside its window
    Active,

    /// Switched off
    Disabled,

    /// Window has not opened
    NotStarted,

    /// Window has closed
    Expired,
}

/// Offer
#[derive(Debug, Clone, PartialEq)]
pub struct Offer {
    /// Identity
    pub uuid: Uuid,

    /// Display name
    pub name: String,

    /// Discount rule
    pub kind: OfferKind,

    /// Redemption code, unique when present
    pub coupon_code: Option<String>,

    /// Scope
    pub target: OfferTarget,

    /// Window start (inclusive)
    pub starts_at: Timestamp,

    /// Window end (inclusive)
    pub ends_at: Timestamp,

    /// Admin switch
    pub is_active: bool,

    /// Higher wins
    pub priority: i32,

    /// Creation instant, used to break priority ties
    pub created_at: Timestamp,
}

impl Offer {
    /// Classify the offer at `now`.
    pub fn availability_at(&self, now: Timestamp) -> Availability {
        if !self.is_active {
            Availability::Disabled
        } else if now < self.starts_at {
            Availability::NotStarted
        } else if now > self.ends_at {
            Availability::Expired
        } else {
            Availability::Active
        }
    }

    /// Enabled and inside its window.
    pub fn is_active_at(&self, now: Timestamp) -> bool {
        self.availability_at(now) == Availability::Active
    }

    /// Whether the offer's target covers the product or any level of its category chain.
    pub fn targets_product(&self, targets: &ProductTargets) -> bool {
        match self.target.target_type {
            TargetType::Product => self.target.contains(&targets.product),
            TargetType::Category => self.target.contains(&targets.category),
            TargetType::Subcategory => self.target.contains(&targets.subcategory),
            TargetType::SubSubcategory => targets
                .sub_subcategory
                .is_some_and(|uuid| self.target.contains(&uuid)),
            TargetType::Cart | TargetType::Order => false,
        }
    }

    /// Automatically applied line offer: no code, line-level kind.
    pub fn is_line_offer(&self) -> bool {
        self.coupon_code.is_none() && self.kind.is_line_level()
    }

    /// Automatically applied cart/order offer.
    pub fn is_cart_offer(&self) -> bool {
        self.coupon_code.is_none()
            && self.target.target_type.is_cart_level()
            && matches!(
                self.kind,
                OfferKind::FreeShipping { .. } | OfferKind::CartDiscount { .. }
            )
    }

    /// Copy stored on cart and order lines.
    pub fn snapshot(&self) -> OfferSnapshot {
        OfferSnapshot {
            uuid: self.uuid,
            name: self.name.clone(),
            kind: self.kind.clone(),
            ends_at: self.ends_at,
        }
    }
}

/// Frozen copy of the offer that priced a line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferSnapshot {
    /// Offer identity
    pub uuid: Uuid,

    /// Offer name at the time of pricing
    pub name: String,

    /// Discount rule, flattened so the JSON is tagged by `offer_type`
    #[serde(flatten)]
    pub kind: OfferKind,

    /// When the offer ends
    pub ends_at: Timestamp,
}

/// Order offers by precedence: priority, then most recently created, then uuid.
pub fn compare_precedence(a: &Offer, b: &Offer) -> Ordering {
    a.priority
        .cmp(&b.priority)
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.uuid.cmp(&b.uuid))
}

/// Pick the winning automatic offer for a product.
///
/// Candidates must be line offers, active at `now`, and target the product
/// or a level of its category chain. `None` means the price is unchanged.
pub fn resolve_best_offer<'a>(
    offers: &'a [Offer],
    targets: &ProductTargets,
    now: Timestamp,
) -> Option<&'a Offer> {
    offers
        .iter()
        .filter(|offer| {
            offer.is_line_offer() && offer.is_active_at(now) && offer.targets_product(targets)
        })
        .max_by(|a, b| compare_precedence(a, b))
}

/// Offers that match a line but do not apply to it yet.
///
/// That is offers that have not started, and buy-X-get-Y offers whose `buy`
/// threshold the line quantity has not reached. The applied offer is skipped.
pub fn upcoming_offers(
    offers: &[Offer],
    targets: &ProductTargets,
    quantity: u32,
    applied: Option<Uuid>,
    now: Timestamp,
) -> UpcomingOffers {
    let mut upcoming: Vec<&Offer> = offers
        .iter()
        .filter(|offer| offer.is_line_offer() && offer.targets_product(targets))
        .filter(|offer| Some(offer.uuid) != applied)
        .filter(|offer| match offer.availability_at(now) {
            Availability::NotStarted => true,
            Availability::Active => {
                matches!(offer.kind, OfferKind::BuyXGetY { buy, .. } if quantity < buy)
            }
            Availability::Disabled | Availability::Expired => false,
        })
        .collect();

    upcoming.sort_by(|a, b| compare_precedence(b, a));

    upcoming.into_iter().map(Offer::snapshot).collect()
}

/// Active automatic cart/order offers, highest precedence first.
pub fn active_cart_offers(offers: &[Offer], now: Timestamp) -> Vec<&Offer> {
    let mut active: Vec<&Offer> = offers
        .iter()
        .filter(|offer| offer.is_cart_offer() && offer.is_active_at(now))
        .collect();

    active.sort_by(|a, b| compare_precedence(b, a));

    active
}

/// Whether an active cart/order free-shipping offer's threshold is met by `amount`.
pub fn free_shipping_unlocked(offers: &[Offer], amount: u64, now: Timestamp) -> bool {
    active_cart_offers(offers, now)
        .into_iter()
        .any(|offer| match offer.kind {
            OfferKind::FreeShipping { min_cart_value } => {
                min_cart_value.is_none_or(|minimum| amount >= minimum)
            }
            _ => false,
        })
}
