//! Product response models.

use dukkan::offers::OfferSnapshot;
use dukkan_app::domain::products::models::{PricedProduct, Product};
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Product Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductResponse {
    /// The unique identifier of the product
    pub uuid: Uuid,

    pub name: String,

    pub description: Option<String>,

    /// Unit price in fils
    pub price: u64,

    /// Unit price in fils after the best automatic offer
    pub price_after_offer: u64,

    /// Units in stock
    pub quantity: u32,

    pub category_uuid: Uuid,

    pub subcategory_uuid: Uuid,

    pub sub_subcategory_uuid: Option<Uuid>,

    /// Offer that set `price_after_offer`
    #[salvo(schema(value_type = Object))]
    pub applied_offer: Option<OfferSnapshot>,

    /// The date and time the product was created
    pub created_at: String,

    /// The date and time the product was last updated
    pub updated_at: String,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        PricedProduct {
            price_after_offer: product.price,
            product,
            applied_offer: None,
        }
        .into()
    }
}

impl From<PricedProduct> for ProductResponse {
    fn from(priced: PricedProduct) -> Self {
        let product = priced.product;

        Self {
            uuid: product.uuid.into_uuid(),
            name: product.name,
            description: product.description,
            price: product.price,
            price_after_offer: priced.price_after_offer,
            quantity: product.quantity,
            category_uuid: product.category_uuid,
            subcategory_uuid: product.subcategory_uuid,
            sub_subcategory_uuid: product.sub_subcategory_uuid,
            applied_offer: priced.applied_offer,
            created_at: product.created_at.to_string(),
            updated_at: product.updated_at.to_string(),
        }
    }
}
