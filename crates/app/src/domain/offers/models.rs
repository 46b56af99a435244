//! Offer Models

use dukkan::offers::{OfferKind, OfferTarget};
use jiff::Timestamp;
use uuid::Uuid;

use crate::domain::offers::errors::OffersServiceError;

/// New Offer Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewOffer {
    pub uuid: Uuid,
    pub details: OfferDetails,
}

/// Editable offer fields.
#[derive(Debug, Clone, PartialEq)]
pub struct OfferDetails {
    pub name: String,
    pub kind: OfferKind,
    pub coupon_code: Option<String>,
    pub target: OfferTarget,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub is_active: bool,
    pub priority: i32,
}

impl OfferDetails {
    /// Reject combinations the pricing pipeline can never apply.
    ///
    /// # Errors
    ///
    /// Returns [`OffersServiceError::InvalidData`] describing the problem.
    pub fn validate(&self) -> Result<(), OffersServiceError> {
        if self.starts_at > self.ends_at {
            return Err(invalid("offer ends before it starts"));
        }

        let cart_level = self.target.target_type.is_cart_level();

        if cart_level && !self.target.uuids.is_empty() {
            return Err(invalid("cart and order offers take no target uuids"));
        }

        if !cart_level && self.target.uuids.is_empty() {
            return Err(invalid("catalog offers need at least one target uuid"));
        }

        if self.coupon_code.is_some() && !self.kind.is_redeemable_as_coupon() {
            return Err(invalid("only coupon, percentage and fixed offers can carry a code"));
        }

        if matches!(self.kind, OfferKind::Coupon { .. }) && self.coupon_code.is_none() {
            return Err(invalid("coupon offers need a code"));
        }

        if let OfferKind::BuyXGetY { buy, get } = self.kind
            && (buy == 0 || get == 0)
        {
            return Err(invalid("buy and get must both be at least 1"));
        }

        let line_discount = matches!(
            self.kind,
            OfferKind::Percentage { .. } | OfferKind::Fixed { .. } | OfferKind::BuyXGetY { .. }
        );

        if cart_level && line_discount && self.coupon_code.is_none() {
            return Err(invalid("line discounts cannot target a cart or order"));
        }

        if !cart_level && matches!(self.kind, OfferKind::CartDiscount { .. }) {
            return Err(invalid("cart discounts must target a cart or order"));
        }

        Ok(())
    }
}

fn invalid(reason: &str) -> OffersServiceError {
    OffersServiceError::Validation(reason.to_owned())
}

#[cfg(test)]
mod tests {
    use dukkan::{money::from_points, offers::TargetType};
    use jiff::ToSpan;
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use super::*;

    fn details(kind: OfferKind, target: OfferTarget) -> TestResult<OfferDetails> {
        let starts_at: Timestamp = "2026-01-01T00:00:00Z".parse()?;

        Ok(OfferDetails {
            name: "Sale".to_owned(),
            kind,
            coupon_code: None,
            target,
            starts_at,
            ends_at: starts_at.checked_add(240.hours())?,
            is_active: true,
            priority: 0,
        })
    }

    fn product_target() -> OfferTarget {
        OfferTarget {
            target_type: TargetType::Product,
            uuids: vec![Uuid::now_v7()],
        }
    }

    #[test]
    fn accepts_product_percentage() -> TestResult {
        let offer = details(
            OfferKind::Percentage {
                percent: from_points(Decimal::from(15)),
            },
            product_target(),
        )?;

        assert!(offer.validate().is_ok());

        Ok(())
    }

    #[test]
    fn rejects_inverted_window() -> TestResult {
        let mut offer = details(OfferKind::Fixed { amount: 500 }, product_target())?;

        std::mem::swap(&mut offer.starts_at, &mut offer.ends_at);

        assert!(matches!(
            offer.validate(),
            Err(OffersServiceError::Validation(_))
        ));

        Ok(())
    }

    #[test]
    fn rejects_code_on_buy_x_get_y() -> TestResult {
        let mut offer = details(OfferKind::BuyXGetY { buy: 2, get: 1 }, product_target())?;

        offer.coupon_code = Some("BOGO".to_owned());

        assert!(offer.validate().is_err());

        Ok(())
    }

    #[test]
    fn cart_target_needs_no_uuids() -> TestResult {
        let offer = details(
            OfferKind::FreeShipping {
                min_cart_value: Some(20_000),
            },
            OfferTarget::cart(),
        )?;

        assert!(offer.validate().is_ok());

        Ok(())
    }

    #[test]
    fn catalog_target_needs_uuids() -> TestResult {
        let offer = details(
            OfferKind::Fixed { amount: 100 },
            OfferTarget {
                target_type: TargetType::Category,
                uuids: Vec::new(),
            },
        )?;

        assert!(offer.validate().is_err());

        Ok(())
    }

    #[test]
    fn coupon_kind_needs_code() -> TestResult {
        let offer = details(
            OfferKind::Coupon {
                percent: from_points(Decimal::TEN),
            },
            OfferTarget {
                target_type: TargetType::Order,
                uuids: Vec::new(),
            },
        )?;

        assert!(offer.validate().is_err());

        Ok(())
    }
}
