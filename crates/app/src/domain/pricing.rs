//! Pricing inputs
//!
//! Loads the catalog slice and offer candidates the core pipeline needs to
//! price a set of cart lines, inside the caller's transaction.

use dukkan::{
    money::AmountError,
    offers::Offer,
    products::{Catalog, ProductSnapshot, catalog_from},
};
use jiff::Timestamp;
use rustc_hash::FxHashSet;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::domain::{
    offers::repository::PgOffersRepository,
    products::{models::Product, repository::PgProductsRepository},
};

/// Products and offers relevant to a set of lines.
#[derive(Debug, Clone, Default)]
pub(crate) struct PricingInputs {
    pub catalog: Catalog,
    pub offers: Vec<Offer>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PricingLoader {
    products: PgProductsRepository,
    offers: PgOffersRepository,
}

impl PricingLoader {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            products: PgProductsRepository::new(),
            offers: PgOffersRepository::new(),
        }
    }

    pub(crate) async fn for_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        products: &[Uuid],
        now: Timestamp,
    ) -> Result<PricingInputs, sqlx::Error> {
        let snapshots = self
            .products
            .get_products(tx, products)
            .await?
            .iter()
            .map(Product::snapshot)
            .collect::<Result<Vec<ProductSnapshot>, AmountError>>()
            .map_err(|error| sqlx::Error::ColumnDecode {
                index: "price".to_owned(),
                source: Box::new(error),
            })?;

        let targets = target_uuids(&snapshots);

        let offers = self.offers.pricing_candidates(tx, &targets, now).await?;

        Ok(PricingInputs {
            catalog: catalog_from(snapshots),
            offers,
        })
    }
}

/// Every UUID an offer could target to reach one of the products.
fn target_uuids(products: &[ProductSnapshot]) -> Vec<Uuid> {
    let mut uuids = FxHashSet::default();

    for product in products {
        let targets = product.targets;

        uuids.insert(targets.product);
        uuids.insert(targets.category);
        uuids.insert(targets.subcategory);
        uuids.extend(targets.sub_subcategory);
    }

    uuids.into_iter().collect()
}
