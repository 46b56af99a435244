//! Products

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The scopes an offer may target for a given product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductTargets {
    /// The product itself
    pub product: Uuid,

    /// Top-level category
    pub category: Uuid,

    /// Subcategory
    pub subcategory: Uuid,

    /// Optional third level
    pub sub_subcategory: Option<Uuid>,
}

/// Pricing-relevant view of a catalog product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSnapshot {
    /// Current unit price
    pub price: Money<'static, Currency>,

    /// Units in stock
    pub stock: u32,

    /// Category chain
    pub targets: ProductTargets,
}

impl ProductSnapshot {
    /// Product UUID.
    pub fn uuid(&self) -> Uuid {
        self.targets.product
    }

    /// Whether at least one unit can be sold.
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// Products keyed by UUID, as loaded for one pricing pass.
pub type Catalog = FxHashMap<Uuid, ProductSnapshot>;

/// Build a [`Catalog`] from snapshots.
pub fn catalog_from<I>(products: I) -> Catalog
where
    I: IntoIterator<Item = ProductSnapshot>,
{
    products
        .into_iter()
        .map(|product| (product.uuid(), product))
        .collect()
}
