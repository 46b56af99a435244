//! Carts
//!
//! Line mutations and the refresh pass that reprices a cart against the
//! current catalog and offers.

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    discounts::{DiscountError, apply_discount},
    money::{from_fils, to_fils, zero},
    offers::{
        Offer, OfferKind, OfferSnapshot, UpcomingOffers, free_shipping_unlocked,
        resolve_best_offer, upcoming_offers,
    },
    products::{Catalog, ProductSnapshot},
};

/// Errors raised by cart mutations.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// Quantity must be at least one.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// Not enough stock for the requested quantity.
    #[error("only {available} in stock, {requested} requested")]
    InsufficientStock {
        /// Requested units
        requested: u32,

        /// Units in stock
        available: u32,
    },

    /// No line with the given UUID.
    #[error("cart line not found")]
    LineNotFound,

    /// Pricing failed.
    #[error(transparent)]
    Discount(#[from] DiscountError),
}

/// Display attributes that distinguish otherwise identical lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineAttributes {
    /// Colour
    pub color: Option<String>,

    /// Size
    pub size: Option<String>,

    /// Material
    pub material: Option<String>,
}

/// Cart Line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Line identity
    pub uuid: Uuid,

    /// Product on the line
    pub product_uuid: Uuid,

    /// Chosen attributes
    pub attributes: LineAttributes,

    /// Units, at least one
    pub quantity: u32,

    /// Unit price before discount, in fils
    pub price: u64,

    /// Unit price after the applied offer, in fils
    pub price_after_offer: u64,

    /// Amount charged for the line, in fils
    pub line_total: u64,

    /// Offer that priced the line
    pub applied_offer: Option<OfferSnapshot>,

    /// Matching offers that do not apply yet
    pub upcoming_offers: UpcomingOffers,
}

impl CartLine {
    /// A new, not yet priced line.
    pub fn new(uuid: Uuid, product_uuid: Uuid, attributes: LineAttributes, quantity: u32) -> Self {
        Self {
            uuid,
            product_uuid,
            attributes,
            quantity,
            price: 0,
            price_after_offer: 0,
            line_total: 0,
            applied_offer: None,
            upcoming_offers: UpcomingOffers::new(),
        }
    }

    fn same_variant(&self, product_uuid: Uuid, attributes: &LineAttributes) -> bool {
        self.product_uuid == product_uuid && &self.attributes == attributes
    }

    /// Whether the applied offer waives shipping for a cart worth `total` fils.
    pub fn has_free_shipping_at(&self, total: u64) -> bool {
        match self.applied_offer.as_ref().map(|offer| &offer.kind) {
            Some(OfferKind::FreeShipping { min_cart_value }) => {
                min_cart_value.is_none_or(|minimum| total >= minimum)
            }
            _ => false,
        }
    }
}

/// Sum of line totals.
///
/// # Errors
///
/// Returns an error if a stored amount is out of range or the sum overflows.
pub fn lines_total(lines: &[CartLine]) -> Result<Money<'static, Currency>, DiscountError> {
    lines
        .iter()
        .try_fold(zero(), |sum, line| -> Result<_, DiscountError> {
            Ok(sum.add(from_fils(line.line_total)?)?)
        })
}

/// Whether shipping is waived for `lines` worth `total` fils.
///
/// Either a line's free-shipping offer or an active cart/order offer may
/// waive it, each only once its minimum is met. Empty carts never qualify.
pub fn waives_shipping(lines: &[CartLine], offers: &[Offer], total: u64, now: Timestamp) -> bool {
    !lines.is_empty()
        && (lines.iter().any(|line| line.has_free_shipping_at(total))
            || free_shipping_unlocked(offers, total, now))
}

/// Cart aggregates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    /// Sum of line totals
    pub total_cart_price: u64,

    /// Equal to `total_cart_price`; no cart-wide layer is applied here
    pub total_price_after_discount: u64,

    /// Shipping is waived
    pub has_free_shipping: bool,
}

/// Output of [`refresh`].
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshedCart {
    /// Lines still purchasable, repriced
    pub lines: Vec<CartLine>,

    /// Lines removed because the product vanished or sold out
    pub pruned: Vec<CartLine>,

    /// Aggregates over `lines`
    pub totals: CartTotals,

    /// Distinct offers applied across lines
    pub applied_offers: Vec<OfferSnapshot>,
}

/// Reprice a cart.
///
/// Lines whose product is missing from `catalog` or out of stock are pruned.
/// Every remaining line takes the current catalog price and the best
/// automatic offer. Running it twice without changes yields the same result.
///
/// # Errors
///
/// Returns an error if a line total overflows.
pub fn refresh(
    lines: Vec<CartLine>,
    catalog: &Catalog,
    offers: &[Offer],
    now: Timestamp,
) -> Result<RefreshedCart, DiscountError> {
    let (kept, pruned): (Vec<CartLine>, Vec<CartLine>) =
        lines.into_iter().partition(|line| {
            catalog
                .get(&line.product_uuid)
                .is_some_and(ProductSnapshot::in_stock)
        });

    let mut repriced = Vec::with_capacity(kept.len());

    for line in kept {
        let Some(product) = catalog.get(&line.product_uuid) else {
            continue;
        };

        repriced.push(price_line(line, product, offers, now)?);
    }

    let total = to_fils(&lines_total(&repriced)?)?;

    let has_free_shipping = waives_shipping(&repriced, offers, total, now);

    let mut applied_offers: Vec<OfferSnapshot> = Vec::new();

    for snapshot in repriced.iter().filter_map(|line| line.applied_offer.as_ref()) {
        if !applied_offers.iter().any(|seen| seen.uuid == snapshot.uuid) {
            applied_offers.push(snapshot.clone());
        }
    }

    Ok(RefreshedCart {
        lines: repriced,
        pruned,
        totals: CartTotals {
            total_cart_price: total,
            total_price_after_discount: total,
            has_free_shipping,
        },
        applied_offers,
    })
}

fn price_line(
    mut line: CartLine,
    product: &ProductSnapshot,
    offers: &[Offer],
    now: Timestamp,
) -> Result<CartLine, DiscountError> {
    let best = resolve_best_offer(offers, &product.targets, now);
    let priced = apply_discount(best.map(|offer| &offer.kind), product.price, line.quantity)?;
    let applied = best.filter(|_| priced.applied);

    line.price = to_fils(&product.price)?;
    line.price_after_offer = to_fils(&priced.unit_price)?;
    line.line_total = to_fils(&priced.line_total)?;
    line.applied_offer = applied.map(Offer::snapshot);
    line.upcoming_offers = upcoming_offers(
        offers,
        &product.targets,
        line.quantity,
        applied.map(|offer| offer.uuid),
        now,
    );

    Ok(line)
}

/// Add units of a product variant, merging with an existing line.
///
/// Returns the UUID of the line that now holds the units.
///
/// # Errors
///
/// Returns an error if `quantity` is zero or the merged quantity exceeds stock.
pub fn add_line(
    lines: &mut Vec<CartLine>,
    uuid: Uuid,
    product: &ProductSnapshot,
    attributes: LineAttributes,
    quantity: u32,
) -> Result<Uuid, CartError> {
    if quantity == 0 {
        return Err(CartError::InvalidQuantity);
    }

    let product_uuid = product.uuid();

    if let Some(existing) = lines
        .iter_mut()
        .find(|line| line.same_variant(product_uuid, &attributes))
    {
        let requested = existing.quantity.saturating_add(quantity);

        ensure_stock(product, requested)?;

        existing.quantity = requested;

        return Ok(existing.uuid);
    }

    ensure_stock(product, quantity)?;

    lines.push(CartLine::new(uuid, product_uuid, attributes, quantity));

    Ok(uuid)
}

/// Set a line's quantity.
///
/// # Errors
///
/// Returns an error for a missing line, zero quantity or insufficient stock.
pub fn set_line_quantity(
    lines: &mut [CartLine],
    line: Uuid,
    product: Option<&ProductSnapshot>,
    quantity: u32,
) -> Result<(), CartError> {
    if quantity == 0 {
        return Err(CartError::InvalidQuantity);
    }

    let target = lines
        .iter_mut()
        .find(|candidate| candidate.uuid == line)
        .ok_or(CartError::LineNotFound)?;

    match product {
        Some(product) => ensure_stock(product, quantity)?,
        None => {
            return Err(CartError::InsufficientStock {
                requested: quantity,
                available: 0,
            });
        }
    }

    target.quantity = quantity;

    Ok(())
}

/// Remove a line.
///
/// # Errors
///
/// Returns [`CartError::LineNotFound`] when no line matches.
pub fn remove_line(lines: &mut Vec<CartLine>, line: Uuid) -> Result<CartLine, CartError> {
    let index = lines
        .iter()
        .position(|candidate| candidate.uuid == line)
        .ok_or(CartError::LineNotFound)?;

    Ok(lines.remove(index))
}

fn ensure_stock(product: &ProductSnapshot, requested: u32) -> Result<(), CartError> {
    if requested > product.stock {
        return Err(CartError::InsufficientStock {
            requested,
            available: product.stock,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        fixtures::{NOW, offer, percentage, product},
        money::CURRENCY,
        offers::TargetType,
        products::catalog_from,
    };

    use super::*;

    fn line_for(product: &ProductSnapshot, quantity: u32) -> CartLine {
        CartLine::new(
            Uuid::now_v7(),
            product.uuid(),
            LineAttributes::default(),
            quantity,
        )
    }

    #[test]
    fn refresh_prices_lines_and_sums_totals() -> TestResult {
        let shirt = product(10_000, 5);
        let socks = product(1_500, 10);
        let offers = [offer(percentage(10), TargetType::Product, shirt.uuid())];
        let lines = vec![line_for(&shirt, 2), line_for(&socks, 3)];
        let catalog = catalog_from([shirt, socks]);

        let cart = refresh(lines, &catalog, &offers, NOW)?;

        assert_eq!(cart.totals.total_cart_price, 18_000 + 4_500);
        assert_eq!(
            cart.totals.total_price_after_discount,
            cart.totals.total_cart_price
        );
        assert_eq!(cart.applied_offers.len(), 1);
        assert!(cart.pruned.is_empty());

        Ok(())
    }

    #[test]
    fn refresh_is_idempotent() -> TestResult {
        let shirt = product(10_000, 5);
        let offers = [offer(
            OfferKind::BuyXGetY { buy: 2, get: 1 },
            TargetType::Category,
            shirt.targets.category,
        )];
        let lines = vec![line_for(&shirt, 3)];
        let catalog = catalog_from([shirt]);

        let first = refresh(lines, &catalog, &offers, NOW)?;
        let second = refresh(first.lines.clone(), &catalog, &offers, NOW)?;

        assert_eq!(first, second);
        assert_eq!(second.totals.total_cart_price, 20_000);

        Ok(())
    }

    #[test]
    fn sold_out_line_is_pruned_and_total_drops_by_its_contribution() -> TestResult {
        let shirt = product(10_000, 5);
        let socks = product(1_500, 10);
        let lines = vec![line_for(&shirt, 1), line_for(&socks, 2)];
        let mut catalog = catalog_from([shirt.clone(), socks]);

        let before = refresh(lines, &catalog, &[], NOW)?;

        if let Some(entry) = catalog.get_mut(&shirt.uuid()) {
            entry.stock = 0;
        }

        let after = refresh(before.lines.clone(), &catalog, &[], NOW)?;

        assert_eq!(after.lines.len(), 1);
        assert_eq!(after.pruned.len(), 1);
        assert_eq!(
            before.totals.total_cart_price - after.totals.total_cart_price,
            after.pruned.iter().map(|line| line.line_total).sum::<u64>()
        );

        Ok(())
    }

    #[test]
    fn vanished_product_is_pruned() -> TestResult {
        let shirt = product(10_000, 5);
        let lines = vec![line_for(&shirt, 1)];

        let cart = refresh(lines, &Catalog::default(), &[], NOW)?;

        assert!(cart.lines.is_empty());
        assert_eq!(cart.totals, CartTotals::default());

        Ok(())
    }

    #[test]
    fn unmet_buy_x_get_y_is_upcoming_not_applied() -> TestResult {
        let shirt = product(10_000, 5);
        let bundle = offer(
            OfferKind::BuyXGetY { buy: 2, get: 1 },
            TargetType::Product,
            shirt.uuid(),
        );
        let offers = [bundle.clone()];
        let lines = vec![line_for(&shirt, 1)];
        let catalog = catalog_from([shirt]);

        let cart = refresh(lines, &catalog, &offers, NOW)?;
        let line = cart.lines.first().ok_or("line missing")?;

        assert!(line.applied_offer.is_none());
        assert_eq!(line.upcoming_offers.len(), 1);
        assert_eq!(line.line_total, 10_000);

        Ok(())
    }

    #[test]
    fn free_shipping_from_line_offer_or_cart_threshold() -> TestResult {
        let shirt = product(30_000, 5);
        let line_offer = offer(
            OfferKind::FreeShipping {
                min_cart_value: None,
            },
            TargetType::Product,
            shirt.uuid(),
        );
        let cart_offer = offer(
            OfferKind::FreeShipping {
                min_cart_value: Some(50_000),
            },
            TargetType::Cart,
            Uuid::nil(),
        );
        let catalog = catalog_from([shirt.clone()]);

        let flagged = refresh(vec![line_for(&shirt, 1)], &catalog, &[line_offer], NOW)?;

        assert!(flagged.totals.has_free_shipping);

        let below = refresh(
            vec![line_for(&shirt, 1)],
            &catalog,
            &[cart_offer.clone()],
            NOW,
        )?;
        let above = refresh(vec![line_for(&shirt, 2)], &catalog, &[cart_offer], NOW)?;

        assert!(!below.totals.has_free_shipping);
        assert!(above.totals.has_free_shipping);

        Ok(())
    }

    #[test]
    fn line_free_shipping_waits_for_its_minimum() -> TestResult {
        let shirt = product(1_000, 100);
        let free_over_fifty = offer(
            OfferKind::FreeShipping {
                min_cart_value: Some(50_000),
            },
            TargetType::Product,
            shirt.uuid(),
        );
        let offers = [free_over_fifty];
        let catalog = catalog_from([shirt.clone()]);

        let small = refresh(vec![line_for(&shirt, 1)], &catalog, &offers, NOW)?;

        assert_eq!(small.totals.total_cart_price, 1_000);
        assert!(!small.totals.has_free_shipping);

        let large = refresh(vec![line_for(&shirt, 50)], &catalog, &offers, NOW)?;

        assert_eq!(large.totals.total_cart_price, 50_000);
        assert!(large.totals.has_free_shipping);

        Ok(())
    }

    #[test]
    fn refresh_takes_current_catalog_price() -> TestResult {
        let shirt = product(10_000, 5);
        let mut line = line_for(&shirt, 1);
        line.price = 8_000;
        let mut catalog = catalog_from([shirt.clone()]);

        if let Some(entry) = catalog.get_mut(&shirt.uuid()) {
            entry.price = Money::from_minor(12_000, CURRENCY);
        }

        let cart = refresh(vec![line], &catalog, &[], NOW)?;

        assert_eq!(cart.totals.total_cart_price, 12_000);

        Ok(())
    }

    #[test]
    fn add_merges_same_variant_and_checks_stock() -> TestResult {
        let shirt = product(10_000, 3);
        let mut lines = Vec::new();

        let first = add_line(&mut lines, Uuid::now_v7(), &shirt, LineAttributes::default(), 2)?;
        let second = add_line(&mut lines, Uuid::now_v7(), &shirt, LineAttributes::default(), 1)?;

        assert_eq!(first, second);
        assert_eq!(lines.len(), 1);

        let overflow = add_line(&mut lines, Uuid::now_v7(), &shirt, LineAttributes::default(), 1);

        assert_eq!(
            overflow,
            Err(CartError::InsufficientStock {
                requested: 4,
                available: 3
            })
        );

        Ok(())
    }

    #[test]
    fn add_keeps_distinct_variants_apart() -> TestResult {
        let shirt = product(10_000, 10);
        let mut lines = Vec::new();
        let red = LineAttributes {
            color: Some("red".to_owned()),
            ..LineAttributes::default()
        };

        add_line(&mut lines, Uuid::now_v7(), &shirt, LineAttributes::default(), 1)?;
        add_line(&mut lines, Uuid::now_v7(), &shirt, red, 1)?;

        assert_eq!(lines.len(), 2);

        Ok(())
    }

    #[test]
    fn set_quantity_validates() -> TestResult {
        let shirt = product(10_000, 3);
        let mut lines = vec![line_for(&shirt, 1)];
        let uuid = lines.first().map(|line| line.uuid).ok_or("line missing")?;

        assert_eq!(
            set_line_quantity(&mut lines, uuid, Some(&shirt), 0),
            Err(CartError::InvalidQuantity)
        );
        assert!(set_line_quantity(&mut lines, uuid, Some(&shirt), 4).is_err());
        assert_eq!(
            set_line_quantity(&mut lines, Uuid::now_v7(), Some(&shirt), 1),
            Err(CartError::LineNotFound)
        );

        set_line_quantity(&mut lines, uuid, Some(&shirt), 3)?;

        assert_eq!(lines.first().map(|line| line.quantity), Some(3));

        Ok(())
    }

    #[test]
    fn remove_unknown_line_fails() {
        let mut lines = Vec::new();

        assert_eq!(
            remove_line(&mut lines, Uuid::now_v7()),
            Err(CartError::LineNotFound)
        );
    }
}
