//! Carts service.

use async_trait::async_trait;
use dukkan::{
    carts::{CartLine, add_line, remove_line, set_line_quantity},
    products::Catalog,
};
use jiff::Timestamp;
use mockall::automock;
use tracing::info;
use uuid::Uuid;

use crate::{
    auth::UserUuid,
    database::Db,
    domain::carts::{
        errors::CartsServiceError,
        models::{Cart, NewCartItem},
        store::CartStore,
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    store: CartStore,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            store: CartStore::new(),
        }
    }

    /// Lock, mutate, reprice and persist the user's cart in one transaction.
    async fn update_cart<F>(
        &self,
        user: UserUuid,
        extra_product: Option<Uuid>,
        now: Timestamp,
        mutate: F,
    ) -> Result<Cart, CartsServiceError>
    where
        F: FnOnce(&mut Vec<CartLine>, &Catalog) -> Result<(), CartsServiceError> + Send,
    {
        let mut tx = self.db.begin().await?;

        let locked = self.store.lock_or_create(&mut tx, user).await?;
        let mut lines = locked.lines;

        let inputs = self
            .store
            .pricing(&mut tx, &lines, extra_product, now)
            .await?;

        mutate(&mut lines, &inputs.catalog)?;

        let refreshed = CartStore::reprice(lines, &inputs, now)?;

        if !refreshed.pruned.is_empty() {
            info!(pruned = refreshed.pruned.len(), "pruned unavailable cart lines");
        }

        let cart = self.store.save(&mut tx, locked.row, refreshed).await?;

        tx.commit().await?;

        Ok(cart)
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    #[tracing::instrument(name = "carts.service.get_cart", skip(self), err)]
    async fn get_cart(&self, user: UserUuid, now: Timestamp) -> Result<Cart, CartsServiceError> {
        self.update_cart(user, None, now, |_, _| Ok(())).await
    }

    #[tracing::instrument(
        name = "carts.service.add_item",
        skip(self, item),
        fields(product_uuid = %item.product_uuid, quantity = item.quantity),
        err
    )]
    async fn add_item(
        &self,
        user: UserUuid,
        item: NewCartItem,
        now: Timestamp,
    ) -> Result<Cart, CartsServiceError> {
        let product_uuid = item.product_uuid.into_uuid();

        self.update_cart(user, Some(product_uuid), now, move |lines, catalog| {
            let product = catalog
                .get(&product_uuid)
                .ok_or(CartsServiceError::ProductNotFound)?;

            add_line(lines, Uuid::now_v7(), product, item.attributes, item.quantity)?;

            Ok(())
        })
        .await
    }

    #[tracing::instrument(name = "carts.service.update_item_quantity", skip(self), err)]
    async fn update_item_quantity(
        &self,
        user: UserUuid,
        item: Uuid,
        quantity: u32,
        now: Timestamp,
    ) -> Result<Cart, CartsServiceError> {
        self.update_cart(user, None, now, move |lines, catalog| {
            let product_uuid = lines
                .iter()
                .find(|line| line.uuid == item)
                .map(|line| line.product_uuid)
                .ok_or(CartsServiceError::ItemNotFound)?;

            set_line_quantity(lines, item, catalog.get(&product_uuid), quantity)?;

            Ok(())
        })
        .await
    }

    #[tracing::instrument(name = "carts.service.remove_item", skip(self), err)]
    async fn remove_item(
        &self,
        user: UserUuid,
        item: Uuid,
        now: Timestamp,
    ) -> Result<Cart, CartsServiceError> {
        self.update_cart(user, None, now, move |lines, _| {
            remove_line(lines, item)?;

            Ok(())
        })
        .await
    }

    #[tracing::instrument(name = "carts.service.clear_cart", skip(self), err)]
    async fn clear_cart(&self, user: UserUuid) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin().await?;

        self.store.delete(&mut tx, user).await?;

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// The caller's cart, repriced and persisted. Created empty if missing.
    async fn get_cart(&self, user: UserUuid, now: Timestamp) -> Result<Cart, CartsServiceError>;

    /// Add units of a product variant, merging with a matching line.
    async fn add_item(
        &self,
        user: UserUuid,
        item: NewCartItem,
        now: Timestamp,
    ) -> Result<Cart, CartsServiceError>;

    /// Set a line's quantity.
    async fn update_item_quantity(
        &self,
        user: UserUuid,
        item: Uuid,
        quantity: u32,
        now: Timestamp,
    ) -> Result<Cart, CartsServiceError>;

    /// Remove a line.
    async fn remove_item(
        &self,
        user: UserUuid,
        item: Uuid,
        now: Timestamp,
    ) -> Result<Cart, CartsServiceError>;

    /// Delete the cart and all of its lines.
    async fn clear_cart(&self, user: UserUuid) -> Result<(), CartsServiceError>;
}

#[cfg(test)]
mod tests {
    use dukkan::carts::LineAttributes;
    use testresult::TestResult;

    use crate::{domain::carts::models::NewCartItem, test::TestContext};

    use super::*;

    #[tokio::test]
    async fn added_item_is_priced_and_persisted() -> TestResult {
        let ctx = TestContext::new().await?;
        let product = ctx.create_product(10_000, 5).await?;

        ctx.add_to_cart(product, 2).await?;

        let cart = ctx.carts.get_cart(ctx.user, Timestamp::now()).await?;
        let line = cart.lines.first().ok_or("cart should have a line")?;

        assert_eq!(cart.lines.len(), 1);
        assert_eq!(line.product_uuid, product.into_uuid());
        assert_eq!(line.line_total, 20_000);
        assert_eq!(cart.totals.total_cart_price, 20_000);
        assert_eq!(cart.totals.total_price_after_discount, 20_000);

        Ok(())
    }

    #[tokio::test]
    async fn same_variant_merges_into_one_line() -> TestResult {
        let ctx = TestContext::new().await?;
        let product = ctx.create_product(10_000, 5).await?;

        ctx.add_to_cart(product, 1).await?;
        ctx.add_to_cart(product, 2).await?;

        let cart = ctx.carts.get_cart(ctx.user, Timestamp::now()).await?;
        let quantities: Vec<u32> = cart.lines.iter().map(|line| line.quantity).collect();

        assert_eq!(quantities, [3]);

        Ok(())
    }

    #[tokio::test]
    async fn adding_beyond_stock_is_rejected() -> TestResult {
        let ctx = TestContext::new().await?;
        let product = ctx.create_product(10_000, 2).await?;

        let result = ctx
            .carts
            .add_item(
                ctx.user,
                NewCartItem {
                    product_uuid: product,
                    attributes: LineAttributes::default(),
                    quantity: 3,
                },
                Timestamp::now(),
            )
            .await;

        assert!(matches!(
            result,
            Err(CartsServiceError::InsufficientStock {
                requested: 3,
                available: 2
            })
        ));

        Ok(())
    }

    #[tokio::test]
    async fn cleared_cart_comes_back_empty() -> TestResult {
        let ctx = TestContext::new().await?;
        let product = ctx.create_product(10_000, 5).await?;

        ctx.add_to_cart(product, 1).await?;
        ctx.carts.clear_cart(ctx.user).await?;

        let cart = ctx.carts.get_cart(ctx.user, Timestamp::now()).await?;

        assert!(cart.lines.is_empty());
        assert_eq!(cart.totals.total_cart_price, 0);

        Ok(())
    }
}
