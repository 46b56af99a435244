//! Cart store
//!
//! Lock, reprice and persist a user's cart inside a caller-owned
//! transaction. Shared by cart mutations and checkout.

use dukkan::carts::{CartLine, RefreshedCart, refresh};
use jiff::Timestamp;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::{
    auth::UserUuid,
    domain::{
        carts::{
            CartsServiceError,
            models::Cart,
            repositories::{CartRow, PgCartItemsRepository, PgCartsRepository},
        },
        pricing::{PricingInputs, PricingLoader},
    },
};

/// A locked cart and its stored lines.
#[derive(Debug, Clone)]
pub(crate) struct LockedCart {
    pub row: CartRow,
    pub lines: Vec<CartLine>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct CartStore {
    carts: PgCartsRepository,
    items: PgCartItemsRepository,
    pricing: PricingLoader,
}

impl CartStore {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            carts: PgCartsRepository::new(),
            items: PgCartItemsRepository::new(),
            pricing: PricingLoader::new(),
        }
    }

    /// Lock the user's cart, creating an empty one first if needed.
    pub(crate) async fn lock_or_create(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<LockedCart, CartsServiceError> {
        self.carts.ensure_cart(tx, user).await?;

        self.lock(tx, user)
            .await?
            .ok_or(CartsServiceError::NotFound)
    }

    pub(crate) async fn lock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Option<LockedCart>, CartsServiceError> {
        let Some(row) = self.carts.lock_cart(tx, user).await? else {
            return Ok(None);
        };

        let lines = self.items.get_cart_items(tx, row.uuid).await?;

        Ok(Some(LockedCart { row, lines }))
    }

    /// Catalog and offers for the lines plus any extra products.
    pub(crate) async fn pricing(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        lines: &[CartLine],
        extra: Option<Uuid>,
        now: Timestamp,
    ) -> Result<PricingInputs, CartsServiceError> {
        let mut products: Vec<Uuid> = lines.iter().map(|line| line.product_uuid).collect();

        products.extend(extra);
        products.sort_unstable();
        products.dedup();

        Ok(self.pricing.for_products(tx, &products, now).await?)
    }

    /// Reprice `lines` without persisting.
    pub(crate) fn reprice(
        lines: Vec<CartLine>,
        inputs: &PricingInputs,
        now: Timestamp,
    ) -> Result<RefreshedCart, CartsServiceError> {
        Ok(refresh(lines, &inputs.catalog, &inputs.offers, now)?)
    }

    /// Persist a repriced cart and bump its version.
    pub(crate) async fn save(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        row: CartRow,
        refreshed: RefreshedCart,
    ) -> Result<Cart, CartsServiceError> {
        self.items
            .replace_cart_items(tx, row.uuid, &refreshed.lines)
            .await?;

        let (version, updated_at) = self
            .carts
            .save_totals(tx, row.uuid, &refreshed.totals, &refreshed.applied_offers)
            .await?;

        Ok(Cart {
            uuid: row.uuid,
            user_uuid: row.user_uuid,
            lines: refreshed.lines,
            pruned: refreshed.pruned,
            totals: refreshed.totals,
            applied_offers: refreshed.applied_offers,
            version,
            updated_at,
        })
    }

    pub(crate) async fn delete(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<u64, CartsServiceError> {
        Ok(self.carts.delete_cart(tx, user).await?)
    }
}
