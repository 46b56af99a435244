//! Products service.

use async_trait::async_trait;
use dukkan::{
    discounts::{DiscountError, apply_discount},
    money::to_fils,
    offers::{Offer, resolve_best_offer},
};
use jiff::Timestamp;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        pricing::PricingLoader,
        products::{
            errors::ProductsServiceError,
            models::{NewProduct, PricedProduct, Product, ProductFilter, ProductUpdate, ProductUuid},
            repository::PgProductsRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgProductsService {
    db: Db,
    repository: PgProductsRepository,
    pricing: PricingLoader,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProductsRepository::new(),
            pricing: PricingLoader::new(),
        }
    }
}

/// Price one unit of each product with its best automatic offer.
fn price_products(
    products: Vec<Product>,
    offers: &[Offer],
    now: Timestamp,
) -> Result<Vec<PricedProduct>, ProductsServiceError> {
    products
        .into_iter()
        .map(|product| {
            let snapshot = product.snapshot().map_err(DiscountError::from)?;
            let best = resolve_best_offer(offers, &snapshot.targets, now);
            let priced = apply_discount(best.map(|offer| &offer.kind), snapshot.price, 1)?;

            Ok(PricedProduct {
                price_after_offer: to_fils(&priced.unit_price).map_err(DiscountError::from)?,
                applied_offer: best.filter(|_| priced.applied).map(Offer::snapshot),
                product,
            })
        })
        .collect()
}

#[async_trait]
impl ProductsService for PgProductsService {
    async fn list_products(
        &self,
        filter: ProductFilter,
        now: Timestamp,
    ) -> Result<Vec<PricedProduct>, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let products = self.repository.list_products(&mut tx, filter).await?;

        let uuids: Vec<_> = products.iter().map(|p| p.uuid.into_uuid()).collect();
        let inputs = self.pricing.for_products(&mut tx, &uuids, now).await?;

        tx.commit().await?;

        price_products(products, &inputs.offers, now)
    }

    async fn get_product(
        &self,
        product: ProductUuid,
        now: Timestamp,
    ) -> Result<PricedProduct, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let product = self.repository.get_product(&mut tx, product).await?;

        let inputs = self
            .pricing
            .for_products(&mut tx, &[product.uuid.into_uuid()], now)
            .await?;

        tx.commit().await?;

        price_products(vec![product], &inputs.offers, now)?
            .pop()
            .ok_or(ProductsServiceError::NotFound)
    }

    #[tracing::instrument(
        name = "products.service.create_product",
        skip(self, product),
        fields(product_uuid = %product.uuid),
        err
    )]
    async fn create_product(&self, product: NewProduct) -> Result<Product, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self.repository.create_product(&mut tx, &product).await?;

        tx.commit().await?;

        info!(price = created.price, quantity = created.quantity, "created product");

        Ok(created)
    }

    #[tracing::instrument(name = "products.service.update_product", skip(self, update), err)]
    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<Product, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .update_product(&mut tx, product, &update)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Live products matching the filter, each priced with its best offer.
    async fn list_products(
        &self,
        filter: ProductFilter,
        now: Timestamp,
    ) -> Result<Vec<PricedProduct>, ProductsServiceError>;

    /// Retrieve a single product with its best offer.
    async fn get_product(
        &self,
        product: ProductUuid,
        now: Timestamp,
    ) -> Result<PricedProduct, ProductsServiceError>;

    /// Creates a new product.
    async fn create_product(&self, product: NewProduct) -> Result<Product, ProductsServiceError>;

    /// Updates a product's details, price and stock.
    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<Product, ProductsServiceError>;
}

#[cfg(test)]
mod tests {
    use dukkan::{
        money::from_points,
        offers::{OfferKind, OfferTarget, TargetType},
    };
    use jiff::ToSpan;
    use rust_decimal::Decimal;
    use testresult::TestResult;
    use uuid::Uuid;

    use super::*;

    fn product(price: u64) -> Product {
        let now = Timestamp::UNIX_EPOCH;

        Product {
            uuid: ProductUuid::new(),
            name: "Linen shirt".to_owned(),
            description: None,
            price,
            quantity: 4,
            category_uuid: Uuid::now_v7(),
            subcategory_uuid: Uuid::now_v7(),
            sub_subcategory_uuid: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn listing_applies_best_offer_to_one_unit() -> TestResult {
        let now: Timestamp = "2026-03-01T10:00:00Z".parse()?;
        let shirt = product(8_000);

        let offer = Offer {
            uuid: Uuid::now_v7(),
            name: "Spring".to_owned(),
            kind: OfferKind::Percentage {
                percent: from_points(Decimal::from(25)),
            },
            coupon_code: None,
            target: OfferTarget {
                target_type: TargetType::Category,
                uuids: vec![shirt.category_uuid],
            },
            starts_at: now.checked_sub(1.hour())?,
            ends_at: now.checked_add(1.hour())?,
            is_active: true,
            priority: 0,
            created_at: now.checked_sub(2.hours())?,
        };

        let priced = price_products(vec![shirt, product(3_000)], &[offer], now)?;

        assert_eq!(priced.len(), 2);
        assert_eq!(priced.first().map(|p| p.price_after_offer), Some(6_000));
        assert_eq!(priced.get(1).map(|p| p.price_after_offer), Some(3_000));
        assert!(priced.get(1).is_some_and(|p| p.applied_offer.is_none()));

        Ok(())
    }
}
