//! Test fixtures

use jiff::Timestamp;
use rust_decimal::Decimal;
use rusty_money::Money;
use uuid::Uuid;

use crate::{
    money::{CURRENCY, from_points},
    offers::{Offer, OfferKind, OfferTarget, TargetType},
    products::{ProductSnapshot, ProductTargets},
};

/// 2026-01-01T00:00:00Z
pub(crate) const NOW: Timestamp = Timestamp::constant(1_767_225_600, 0);

const WEEK_SECONDS: i64 = 7 * 24 * 60 * 60;

pub(crate) fn percentage(points: i64) -> OfferKind {
    OfferKind::Percentage {
        percent: from_points(Decimal::from(points)),
    }
}

pub(crate) fn product_targets() -> ProductTargets {
    ProductTargets {
        product: Uuid::now_v7(),
        category: Uuid::now_v7(),
        subcategory: Uuid::now_v7(),
        sub_subcategory: None,
    }
}

pub(crate) fn product(fils: i64, stock: u32) -> ProductSnapshot {
    ProductSnapshot {
        price: Money::from_minor(fils, CURRENCY),
        stock,
        targets: product_targets(),
    }
}

/// An active, automatic offer running for a week either side of [`NOW`].
pub(crate) fn offer(kind: OfferKind, target_type: TargetType, target: Uuid) -> Offer {
    Offer {
        uuid: Uuid::now_v7(),
        name: format!("{} offer", kind.offer_type()),
        kind,
        coupon_code: None,
        target: OfferTarget {
            target_type,
            uuids: if target_type.is_cart_level() {
                Vec::new()
            } else {
                vec![target]
            },
        },
        starts_at: Timestamp::constant(NOW.as_second() - WEEK_SECONDS, 0),
        ends_at: Timestamp::constant(NOW.as_second() + WEEK_SECONDS, 0),
        is_active: true,
        priority: 0,
        created_at: Timestamp::constant(NOW.as_second() - WEEK_SECONDS, 0),
    }
}

impl Offer {
    pub(crate) fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub(crate) fn created(mut self, created_at: Timestamp) -> Self {
        self.created_at = created_at;
        self
    }

    pub(crate) fn window(mut self, starts_at: Timestamp, ends_at: Timestamp) -> Self {
        self.starts_at = starts_at;
        self.ends_at = ends_at;
        self
    }

    pub(crate) fn coupon(mut self, code: &str) -> Self {
        self.coupon_code = Some(code.to_owned());
        self
    }
}
