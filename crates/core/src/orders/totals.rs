//! Order totals
//!
//! Re-derives what an order costs from a freshly refreshed cart. The result
//! is frozen onto the order and never recomputed.

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};

use crate::{
    carts::{CartLine, lines_total, waives_shipping},
    discounts::{DiscountError, discount_on, normalize_coupon},
    money::{CURRENCY, from_fils, to_fils},
    offers::{Availability, DiscountValue, Offer, OfferKind, active_cart_offers},
    shipping::{ShippingOption, ShippingType, select_shipping},
};

/// How a supplied coupon code was judged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CouponOutcome {
    /// No offer carries the code
    NotFound,

    /// Offer is switched off
    Inactive,

    /// Offer window has not opened
    NotStarted {
        /// Window start
        starts_at: Timestamp,
    },

    /// Offer window has closed
    Expired {
        /// Window end
        ends_at: Timestamp,
    },

    /// Offer type cannot be redeemed by code
    WrongType,

    /// Discount applied
    Applied {
        /// Fils off the subtotal
        discount: u64,
    },
}

impl CouponOutcome {
    /// Message shown to the customer.
    pub fn message(&self) -> String {
        match self {
            Self::NotFound => "Coupon code not found".to_owned(),
            Self::Inactive => "This coupon is no longer active".to_owned(),
            Self::NotStarted { starts_at } => format!("This coupon is valid from {starts_at}"),
            Self::Expired { ends_at } => format!("This coupon expired at {ends_at}"),
            Self::WrongType => "This offer cannot be used as a coupon".to_owned(),
            Self::Applied { discount } => {
                let off = Money::from_minor(i64::try_from(*discount).unwrap_or(i64::MAX), CURRENCY);

                format!("Coupon applied: {off} off")
            }
        }
    }

    /// Whether the discount was granted.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    /// Discount granted, zero unless applied.
    pub fn discount(&self) -> u64 {
        match self {
            Self::Applied { discount } => *discount,
            _ => 0,
        }
    }
}

/// Everything the builder needs, already loaded.
#[derive(Debug, Clone, Copy)]
pub struct OrderTotalsInput<'a> {
    /// Refreshed cart lines
    pub lines: &'a [CartLine],

    /// Code supplied by the customer
    pub coupon_code: Option<&'a str>,

    /// Offer found for `coupon_code`, if any
    pub coupon: Option<&'a Offer>,

    /// Candidate cart/order offers: cart discounts and free shipping
    pub cart_offers: &'a [Offer],

    /// Options for the delivery city; empty when no city is known
    pub shipping_options: &'a [ShippingOption],

    /// Requested delivery speed
    pub shipping_type: Option<ShippingType>,

    /// Evaluation instant
    pub now: Timestamp,
}

/// Totals frozen onto an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    /// Sum of line totals
    pub subtotal: u64,

    /// Automatic cart discount, capped at the subtotal
    pub cart_discount: u64,

    /// Cart discount plus coupon discount, capped at the subtotal
    pub discount_value: u64,

    /// `subtotal - discount_value`
    pub total_after_discount: u64,

    /// Charged shipping
    pub shipping_cost: u64,

    /// `total_after_discount + shipping_cost`
    pub total: u64,

    /// Coupon verdict when a code was supplied
    pub coupon: Option<CouponOutcome>,

    /// Shipping waived
    pub has_free_shipping: bool,

    /// Delivery speed charged for, if any
    pub shipping_type: Option<ShippingType>,
}

impl OrderTotals {
    /// Customer-facing coupon message.
    pub fn coupon_message(&self) -> Option<String> {
        self.coupon.as_ref().map(CouponOutcome::message)
    }
}

/// Judge a coupon and compute its discount against `subtotal` fils.
///
/// Percentage-style coupons below one point are read as fractions. Fixed
/// coupons are capped at the subtotal.
///
/// # Errors
///
/// Returns an error when the percentage cannot be represented.
pub fn evaluate_coupon(
    coupon: Option<&Offer>,
    subtotal: u64,
    now: Timestamp,
) -> Result<CouponOutcome, DiscountError> {
    let Some(coupon) = coupon else {
        return Ok(CouponOutcome::NotFound);
    };

    match coupon.availability_at(now) {
        Availability::Disabled => return Ok(CouponOutcome::Inactive),
        Availability::NotStarted => {
            return Ok(CouponOutcome::NotStarted {
                starts_at: coupon.starts_at,
            });
        }
        Availability::Expired => {
            return Ok(CouponOutcome::Expired {
                ends_at: coupon.ends_at,
            });
        }
        Availability::Active => {}
    }

    let discount = match &coupon.kind {
        OfferKind::Coupon { percent } | OfferKind::Percentage { percent } => {
            to_fils(&discount_on(&from_fils(subtotal)?, &normalize_coupon(*percent))?)?
        }
        OfferKind::Fixed { amount } => (*amount).min(subtotal),
        OfferKind::BuyXGetY { .. }
        | OfferKind::FreeShipping { .. }
        | OfferKind::CartDiscount { .. } => return Ok(CouponOutcome::WrongType),
    };

    Ok(CouponOutcome::Applied { discount })
}

/// Discount from the highest-precedence active cart discount whose minimum
/// `subtotal` meets. Zero when none qualifies.
///
/// # Errors
///
/// Returns an error when the percentage cannot be represented.
pub fn cart_discount<'a>(
    offers: &[Offer],
    subtotal: &Money<'a, Currency>,
    now: Timestamp,
) -> Result<Money<'a, Currency>, DiscountError> {
    let fils = to_fils(subtotal)?;

    let value = active_cart_offers(offers, now)
        .into_iter()
        .find_map(|offer| match &offer.kind {
            OfferKind::CartDiscount {
                value,
                min_cart_value,
            } if min_cart_value.is_none_or(|minimum| fils >= minimum) => Some(value),
            _ => None,
        });

    match value {
        None => Ok(Money::from_minor(0, subtotal.currency())),
        Some(DiscountValue::Percent { percent }) => discount_on(subtotal, percent),
        Some(DiscountValue::Amount { amount }) => Ok(from_fils((*amount).min(fils))?),
    }
}

/// Compute order totals.
///
/// 1. Subtotal is the sum of line totals.
/// 2. The best qualifying automatic cart discount comes off the subtotal.
/// 3. A supplied coupon is judged against what remains; only an applied
///    one discounts.
/// 4. Shipping is waived when a line's free-shipping offer or an active
///    cart/order free-shipping offer has its minimum met by the discounted
///    total.
/// 5. Otherwise the requested active option is charged, falling back to
///    active standard delivery, else nothing.
///
/// # Errors
///
/// Returns an error when any amount is out of range or a sum overflows.
pub fn compute_order_totals(input: &OrderTotalsInput<'_>) -> Result<OrderTotals, DiscountError> {
    let subtotal = lines_total(input.lines)?;
    let cart_discount = cart_discount(input.cart_offers, &subtotal, input.now)?;
    let discountable = to_fils(&subtotal.sub(cart_discount)?)?;

    let coupon = input
        .coupon_code
        .map(|_| evaluate_coupon(input.coupon, discountable, input.now))
        .transpose()?;

    let coupon_discount = coupon
        .as_ref()
        .map_or(0, CouponOutcome::discount)
        .min(discountable);

    let discount = cart_discount.add(from_fils(coupon_discount)?)?;
    let total_after_discount = to_fils(&subtotal.sub(discount)?)?;

    let has_free_shipping = waives_shipping(
        input.lines,
        input.cart_offers,
        total_after_discount,
        input.now,
    );

    let selected = select_shipping(input.shipping_options, input.shipping_type);

    let shipping_cost = if has_free_shipping {
        0
    } else {
        selected.map_or(0, |option| option.cost)
    };

    let total = from_fils(total_after_discount)?.add(from_fils(shipping_cost)?)?;

    Ok(OrderTotals {
        subtotal: to_fils(&subtotal)?,
        cart_discount: to_fils(&cart_discount)?,
        discount_value: to_fils(&discount)?,
        total_after_discount,
        shipping_cost,
        total: to_fils(&total)?,
        coupon,
        has_free_shipping,
        shipping_type: selected.map(|option| option.shipping_type),
    })
}

#[cfg(test)]
mod tests {
    use jiff::ToSpan;
    use rust_decimal::Decimal;
    use rusty_money::iso::KWD;
    use testresult::TestResult;
    use uuid::Uuid;

    use crate::{
        carts::LineAttributes,
        fixtures::{NOW, offer, percentage},
        money::from_points,
        offers::TargetType,
    };

    use super::*;

    fn line(line_total: u64) -> CartLine {
        CartLine {
            line_total,
            ..CartLine::new(Uuid::now_v7(), Uuid::now_v7(), LineAttributes::default(), 1)
        }
    }

    fn standard(cost: u64) -> ShippingOption {
        ShippingOption {
            shipping_type: ShippingType::Standard,
            cost,
            delivery_time: Some("2-3 days".to_owned()),
            is_active: true,
        }
    }

    fn input<'a>(
        lines: &'a [CartLine],
        code: Option<&'a str>,
        coupon: Option<&'a Offer>,
        cart_offers: &'a [Offer],
        shipping_options: &'a [ShippingOption],
    ) -> OrderTotalsInput<'a> {
        OrderTotalsInput {
            lines,
            coupon_code: code,
            coupon,
            cart_offers,
            shipping_options,
            shipping_type: None,
            now: NOW,
        }
    }

    #[test]
    fn save10_takes_ten_percent_of_subtotal() -> TestResult {
        let lines = [line(100_000)];
        let save10 = offer(
            OfferKind::Coupon {
                percent: from_points(Decimal::TEN),
            },
            TargetType::Order,
            Uuid::nil(),
        )
        .coupon("SAVE10");

        let totals = compute_order_totals(&input(&lines, Some("SAVE10"), Some(&save10), &[], &[]))?;

        assert_eq!(totals.subtotal, 100_000);
        assert_eq!(totals.discount_value, 10_000);
        assert_eq!(totals.total_after_discount, 90_000);
        assert_eq!(totals.total, 90_000);
        assert_eq!(
            totals.coupon_message(),
            Some(format!("Coupon applied: {} off", Money::from_minor(10_000, KWD)))
        );

        Ok(())
    }

    #[test]
    fn fractional_coupon_value_is_a_fraction() -> TestResult {
        let coupon = offer(
            OfferKind::Coupon {
                percent: from_points("0.1".parse()?),
            },
            TargetType::Order,
            Uuid::nil(),
        );

        assert_eq!(
            evaluate_coupon(Some(&coupon), 50_000, NOW)?,
            CouponOutcome::Applied { discount: 5_000 }
        );

        Ok(())
    }

    #[test]
    fn fixed_coupon_is_capped_at_subtotal() -> TestResult {
        let lines = [line(3_000)];
        let coupon = offer(OfferKind::Fixed { amount: 5_000 }, TargetType::Order, Uuid::nil());

        let totals = compute_order_totals(&input(&lines, Some("FIVE"), Some(&coupon), &[], &[]))?;

        assert_eq!(totals.discount_value, 3_000);
        assert_eq!(totals.total, 0);

        Ok(())
    }

    #[test]
    fn coupon_outcomes_for_unusable_offers() -> TestResult {
        let mut disabled = offer(percentage(10), TargetType::Order, Uuid::nil());
        disabled.is_active = false;

        let later = offer(percentage(10), TargetType::Order, Uuid::nil())
            .window(NOW.checked_add(1.hour())?, NOW.checked_add(2.hours())?);

        let over = offer(percentage(10), TargetType::Order, Uuid::nil())
            .window(NOW.checked_sub(2.hours())?, NOW.checked_sub(1.hour())?);

        let bundle = offer(
            OfferKind::BuyXGetY { buy: 1, get: 1 },
            TargetType::Order,
            Uuid::nil(),
        );

        assert_eq!(evaluate_coupon(None, 1_000, NOW)?, CouponOutcome::NotFound);
        assert_eq!(
            evaluate_coupon(Some(&disabled), 1_000, NOW)?,
            CouponOutcome::Inactive
        );
        assert!(matches!(
            evaluate_coupon(Some(&later), 1_000, NOW)?,
            CouponOutcome::NotStarted { .. }
        ));
        assert!(matches!(
            evaluate_coupon(Some(&over), 1_000, NOW)?,
            CouponOutcome::Expired { .. }
        ));
        assert_eq!(
            evaluate_coupon(Some(&bundle), 1_000, NOW)?,
            CouponOutcome::WrongType
        );

        Ok(())
    }

    #[test]
    fn unapplied_coupon_gives_no_discount() -> TestResult {
        let lines = [line(10_000)];

        let totals = compute_order_totals(&input(&lines, Some("NOPE"), None, &[], &[]))?;

        assert_eq!(totals.discount_value, 0);
        assert_eq!(totals.coupon, Some(CouponOutcome::NotFound));

        Ok(())
    }

    #[test]
    fn free_shipping_threshold_overrides_city_table() -> TestResult {
        let lines = [line(60_000)];
        let free = [offer(
            OfferKind::FreeShipping {
                min_cart_value: Some(50_000),
            },
            TargetType::Cart,
            Uuid::nil(),
        )];
        let options = [standard(2_000)];

        let totals = compute_order_totals(&input(&lines, None, None, &free, &options))?;

        assert!(totals.has_free_shipping);
        assert_eq!(totals.shipping_cost, 0);
        assert_eq!(totals.total, 60_000);

        Ok(())
    }

    #[test]
    fn threshold_is_checked_after_coupon_discount() -> TestResult {
        let lines = [line(55_000)];
        let free = [offer(
            OfferKind::FreeShipping {
                min_cart_value: Some(50_000),
            },
            TargetType::Cart,
            Uuid::nil(),
        )];
        let coupon = offer(percentage(20), TargetType::Order, Uuid::nil());
        let options = [standard(2_000)];

        let totals =
            compute_order_totals(&input(&lines, Some("TWENTY"), Some(&coupon), &free, &options))?;

        assert_eq!(totals.total_after_discount, 44_000);
        assert!(!totals.has_free_shipping);
        assert_eq!(totals.shipping_cost, 2_000);
        assert_eq!(totals.total, 46_000);

        Ok(())
    }

    #[test]
    fn no_city_options_means_free_of_charge() -> TestResult {
        let lines = [line(10_000)];

        let totals = compute_order_totals(&input(&lines, None, None, &[], &[]))?;

        assert_eq!(totals.shipping_cost, 0);
        assert_eq!(totals.shipping_type, None);
        assert_eq!(totals.coupon, None);

        Ok(())
    }

    #[test]
    fn total_identity_holds() -> TestResult {
        let lines = [line(12_345), line(6_789)];
        let coupon = offer(percentage(15), TargetType::Order, Uuid::nil());
        let options = [standard(1_250)];

        let totals =
            compute_order_totals(&input(&lines, Some("FIFTEEN"), Some(&coupon), &[], &options))?;

        assert_eq!(
            totals.total,
            totals.subtotal - totals.discount_value + totals.shipping_cost
        );

        Ok(())
    }

    fn cart_discount_offer(value: DiscountValue, min_cart_value: Option<u64>) -> Offer {
        offer(
            OfferKind::CartDiscount {
                value,
                min_cart_value,
            },
            TargetType::Cart,
            Uuid::nil(),
        )
    }

    fn ten_percent() -> DiscountValue {
        DiscountValue::Percent {
            percent: from_points(Decimal::TEN),
        }
    }

    #[test]
    fn cart_discount_comes_off_the_subtotal() -> TestResult {
        let lines = [line(100_000)];
        let offers = [cart_discount_offer(ten_percent(), None)];

        let totals = compute_order_totals(&input(&lines, None, None, &offers, &[]))?;

        assert_eq!(totals.subtotal, 100_000);
        assert_eq!(totals.cart_discount, 10_000);
        assert_eq!(totals.discount_value, 10_000);
        assert_eq!(totals.total_after_discount, 90_000);
        assert_eq!(totals.total, 90_000);

        Ok(())
    }

    #[test]
    fn cart_discount_waits_for_its_minimum() -> TestResult {
        let lines = [line(40_000)];
        let offers = [cart_discount_offer(ten_percent(), Some(50_000))];

        let totals = compute_order_totals(&input(&lines, None, None, &offers, &[]))?;

        assert_eq!(totals.cart_discount, 0);
        assert_eq!(totals.total, 40_000);

        Ok(())
    }

    #[test]
    fn highest_precedence_cart_discount_wins() -> TestResult {
        let lines = [line(100_000)];
        let offers = [
            cart_discount_offer(ten_percent(), None).with_priority(1),
            cart_discount_offer(DiscountValue::Amount { amount: 5_000 }, None).with_priority(2),
            cart_discount_offer(DiscountValue::Amount { amount: 500_000 }, Some(1_000_000))
                .with_priority(9),
        ];

        let totals = compute_order_totals(&input(&lines, None, None, &offers, &[]))?;

        assert_eq!(totals.cart_discount, 5_000);

        Ok(())
    }

    #[test]
    fn fixed_cart_discount_is_capped_at_subtotal() -> TestResult {
        let lines = [line(3_000)];
        let offers = [cart_discount_offer(DiscountValue::Amount { amount: 5_000 }, None)];

        let totals = compute_order_totals(&input(&lines, None, None, &offers, &[]))?;

        assert_eq!(totals.cart_discount, 3_000);
        assert_eq!(totals.total, 0);

        Ok(())
    }

    #[test]
    fn coupon_applies_after_cart_discount() -> TestResult {
        let lines = [line(100_000)];
        let offers = [cart_discount_offer(ten_percent(), None)];
        let coupon = offer(percentage(20), TargetType::Order, Uuid::nil());

        let totals =
            compute_order_totals(&input(&lines, Some("TWENTY"), Some(&coupon), &offers, &[]))?;

        assert_eq!(totals.cart_discount, 10_000);
        assert_eq!(totals.coupon, Some(CouponOutcome::Applied { discount: 18_000 }));
        assert_eq!(totals.discount_value, 28_000);
        assert_eq!(totals.total, 72_000);

        Ok(())
    }

    #[test]
    fn cart_discount_can_lose_free_shipping() -> TestResult {
        let lines = [line(52_000)];
        let offers = [
            cart_discount_offer(ten_percent(), None),
            offer(
                OfferKind::FreeShipping {
                    min_cart_value: Some(50_000),
                },
                TargetType::Cart,
                Uuid::nil(),
            ),
        ];
        let options = [standard(2_000)];

        let totals = compute_order_totals(&input(&lines, None, None, &offers, &options))?;

        assert_eq!(totals.total_after_discount, 46_800);
        assert!(!totals.has_free_shipping);
        assert_eq!(totals.total, 48_800);

        Ok(())
    }

    #[test]
    fn line_free_shipping_respects_its_minimum() -> TestResult {
        let free_over_fifty = offer(
            OfferKind::FreeShipping {
                min_cart_value: Some(50_000),
            },
            TargetType::Product,
            Uuid::nil(),
        );
        let flagged = |line_total| CartLine {
            applied_offer: Some(free_over_fifty.snapshot()),
            ..line(line_total)
        };
        let options = [standard(2_000)];

        let small = [flagged(1_000)];
        let totals = compute_order_totals(&input(&small, None, None, &[], &options))?;

        assert!(!totals.has_free_shipping);
        assert_eq!(totals.total, 3_000);

        let large = [flagged(50_000)];
        let totals = compute_order_totals(&input(&large, None, None, &[], &options))?;

        assert!(totals.has_free_shipping);
        assert_eq!(totals.total, 50_000);

        Ok(())
    }
}
