//! Discount utilities
//!
//! Line pricing for a single offer, plus the percentage helpers shared with
//! order totals.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::{money::AmountError, offers::OfferKind};

/// Errors specific to discount calculations.
#[derive(Debug, Error, PartialEq)]
pub enum DiscountError {
    /// Price times quantity does not fit in minor units.
    #[error("line total overflowed")]
    Overflow,

    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// Stored amount outside the representable range.
    #[error(transparent)]
    Amount(#[from] AmountError),
}

/// Result of pricing one line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePrice<'a> {
    /// Unit price shown to the customer, rounded to the minor unit
    pub unit_price: Money<'a, Currency>,

    /// Exact amount charged for the line
    pub line_total: Money<'a, Currency>,

    /// Whether the offer changed or flagged the line
    pub applied: bool,
}

impl<'a> LinePrice<'a> {
    /// Price without any offer.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::Overflow`] if the line total overflows.
    pub fn undiscounted(
        unit_price: Money<'a, Currency>,
        quantity: u32,
    ) -> Result<Self, DiscountError> {
        Ok(Self {
            unit_price,
            line_total: line_total(&unit_price, quantity)?,
            applied: false,
        })
    }
}

/// Price a line with at most one offer.
///
/// Percentage and fixed offers reduce the unit price. Buy-X-get-Y gives
/// `floor(q / (buy + get)) * get` units free once `q >= buy`, charging the
/// paid units exactly and showing the averaged unit price. Free shipping
/// leaves the price alone but still counts as applied. Cart discounts and
/// coupons never price a line.
///
/// # Errors
///
/// Returns an error if the arithmetic overflows.
pub fn apply_discount<'a>(
    kind: Option<&OfferKind>,
    unit_price: Money<'a, Currency>,
    quantity: u32,
) -> Result<LinePrice<'a>, DiscountError> {
    let Some(kind) = kind else {
        return LinePrice::undiscounted(unit_price, quantity);
    };

    match kind {
        OfferKind::Percentage { percent } => {
            let discounted = unit_price.sub(discount_on(&unit_price, percent)?)?;

            Ok(LinePrice {
                applied: true,
                ..LinePrice::undiscounted(discounted, quantity)?
            })
        }
        OfferKind::Fixed { amount } => {
            let amount = i64::try_from(*amount).unwrap_or(i64::MAX);
            let discounted = unit_price.to_minor_units().saturating_sub(amount).max(0);

            Ok(LinePrice {
                applied: true,
                ..LinePrice::undiscounted(
                    Money::from_minor(discounted, unit_price.currency()),
                    quantity,
                )?
            })
        }
        OfferKind::BuyXGetY { buy, get } => buy_x_get_y(*buy, *get, unit_price, quantity),
        OfferKind::FreeShipping { .. } => Ok(LinePrice {
            applied: true,
            ..LinePrice::undiscounted(unit_price, quantity)?
        }),
        OfferKind::CartDiscount { .. } | OfferKind::Coupon { .. } => {
            LinePrice::undiscounted(unit_price, quantity)
        }
    }
}

fn buy_x_get_y(
    buy: u32,
    get: u32,
    unit_price: Money<'_, Currency>,
    quantity: u32,
) -> Result<LinePrice<'_>, DiscountError> {
    let group = buy.saturating_add(get);

    if buy == 0 || get == 0 || quantity < buy {
        return LinePrice::undiscounted(unit_price, quantity);
    }

    let free = (quantity / group) * get;
    let paid = quantity - free;
    let total = line_total(&unit_price, paid)?;

    let averaged = (Decimal::from(total.to_minor_units()) / Decimal::from(quantity))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)?;

    Ok(LinePrice {
        unit_price: Money::from_minor(averaged, unit_price.currency()),
        line_total: total,
        applied: true,
    })
}

fn line_total<'a>(
    unit_price: &Money<'a, Currency>,
    quantity: u32,
) -> Result<Money<'a, Currency>, DiscountError> {
    let minor = unit_price
        .to_minor_units()
        .checked_mul(i64::from(quantity))
        .ok_or(DiscountError::Overflow)?;

    Ok(Money::from_minor(minor, unit_price.currency()))
}

/// `percent` of `price`, never more than the price itself.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] when the product cannot be represented.
pub fn discount_on<'a>(
    price: &Money<'a, Currency>,
    percent: &Percentage,
) -> Result<Money<'a, Currency>, DiscountError> {
    let minor = price.to_minor_units();
    let discount = percent_of_minor(percent, minor)?.clamp(0, minor.max(0));

    Ok(Money::from_minor(discount, price.currency()))
}

/// Calculate the discount amount in minor units based on a percentage and a minor unit amount.
///
/// Rounds half away from zero.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the calculation overflows.
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, DiscountError> {
    let minor = Decimal::from_i64(minor).ok_or(DiscountError::PercentConversion)?;

    ((*percent) * Decimal::ONE)
        .checked_mul(minor)
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)
}

/// Read a coupon value below one percentage point as a fraction, so a
/// stored `0.1` means 10%.
pub fn normalize_coupon(percent: Percentage) -> Percentage {
    let points = percent * Decimal::ONE_HUNDRED;

    if points > Decimal::ZERO && points < Decimal::ONE {
        Percentage::from(points)
    } else {
        percent
    }
}
