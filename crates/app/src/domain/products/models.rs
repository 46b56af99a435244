//! Product Models

use dukkan::{
    money::{AmountError, from_fils},
    offers::OfferSnapshot,
    products::{ProductSnapshot, ProductTargets},
};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::uuids::TypedUuid;

/// Product UUID
pub type ProductUuid = TypedUuid<Product>;

/// Product Model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub uuid: ProductUuid,
    pub name: String,
    pub description: Option<String>,
    pub price: u64,
    pub quantity: u32,
    pub category_uuid: Uuid,
    pub subcategory_uuid: Uuid,
    pub sub_subcategory_uuid: Option<Uuid>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

impl Product {
    /// Pricing view of this product.
    ///
    /// # Errors
    ///
    /// Returns an error when the stored price is out of range.
    pub fn snapshot(&self) -> Result<ProductSnapshot, AmountError> {
        Ok(ProductSnapshot {
            price: from_fils(self.price)?,
            stock: self.quantity,
            targets: ProductTargets {
                product: self.uuid.into_uuid(),
                category: self.category_uuid,
                subcategory: self.subcategory_uuid,
                sub_subcategory: self.sub_subcategory_uuid,
            },
        })
    }
}

/// Product with its best automatic offer applied to a single unit.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedProduct {
    pub product: Product,
    pub price_after_offer: u64,
    pub applied_offer: Option<OfferSnapshot>,
}

/// Catalog filter for listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub category: Option<Uuid>,
    pub subcategory: Option<Uuid>,
    pub sub_subcategory: Option<Uuid>,
}

/// New Product Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub name: String,
    pub description: Option<String>,
    pub price: u64,
    pub quantity: u32,
    pub category_uuid: Uuid,
    pub subcategory_uuid: Uuid,
    pub sub_subcategory_uuid: Option<Uuid>,
}

/// Product Update Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductUpdate {
    pub name: String,
    pub description: Option<String>,
    pub price: u64,
    pub quantity: u32,
}
