//! Carts Repository

use dukkan::{carts::CartTotals, offers::OfferSnapshot};
use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, types::Json};

use crate::{
    auth::UserUuid,
    database::amount_to_db,
    domain::carts::models::CartUuid,
};

const ENSURE_CART_SQL: &str = include_str!("../sql/ensure_cart.sql");
const LOCK_CART_SQL: &str = include_str!("../sql/lock_cart.sql");
const SAVE_TOTALS_SQL: &str = include_str!("../sql/save_totals.sql");
const DELETE_CART_SQL: &str = include_str!("../sql/delete_cart.sql");

/// Locked cart row.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CartRow {
    pub uuid: CartUuid,
    pub user_uuid: UserUuid,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartsRepository;

impl PgCartsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn ensure_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<(), sqlx::Error> {
        query(ENSURE_CART_SQL)
            .bind(CartUuid::new())
            .bind(user)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Lock the user's cart row for the rest of the transaction.
    pub(crate) async fn lock_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Option<CartRow>, sqlx::Error> {
        query_as::<Postgres, CartRow>(LOCK_CART_SQL)
            .bind(user)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Store aggregates and bump the version.
    pub(crate) async fn save_totals(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        totals: &CartTotals,
        applied_offers: &[OfferSnapshot],
    ) -> Result<(i64, Timestamp), sqlx::Error> {
        let (version, updated_at): (i64, SqlxTimestamp) = query_as(SAVE_TOTALS_SQL)
            .bind(cart)
            .bind(amount_to_db(totals.total_cart_price, "total_cart_price")?)
            .bind(amount_to_db(
                totals.total_price_after_discount,
                "total_price_after_discount",
            )?)
            .bind(totals.has_free_shipping)
            .bind(Json(applied_offers))
            .fetch_one(&mut **tx)
            .await?;

        Ok((version, updated_at.to_jiff()))
    }

    pub(crate) async fn delete_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_CART_SQL)
            .bind(user)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for CartRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: row.try_get("uuid")?,
            user_uuid: row.try_get("user_uuid")?,
        })
    }
}
