//! Cart Items Repository

use dukkan::{
    carts::{CartLine, LineAttributes},
    offers::{OfferSnapshot, UpcomingOffers},
};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, types::Json};

use crate::{
    database::{amount_to_db, quantity_to_db, try_get_amount, try_get_quantity},
    domain::carts::models::CartUuid,
};

const GET_CART_ITEMS_SQL: &str = include_str!("../sql/get_cart_items.sql");
const DELETE_CART_ITEMS_SQL: &str = include_str!("../sql/delete_cart_items.sql");
const CREATE_CART_ITEM_SQL: &str = include_str!("../sql/create_cart_item.sql");

struct LineRow(CartLine);

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartItemsRepository;

impl PgCartItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_cart_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<Vec<CartLine>, sqlx::Error> {
        let rows = query_as::<Postgres, LineRow>(GET_CART_ITEMS_SQL)
            .bind(cart)
            .fetch_all(&mut **tx)
            .await?;

        Ok(rows.into_iter().map(|row| row.0).collect())
    }

    /// Overwrite the cart's lines, keeping their order.
    pub(crate) async fn replace_cart_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        lines: &[CartLine],
    ) -> Result<(), sqlx::Error> {
        query(DELETE_CART_ITEMS_SQL)
            .bind(cart)
            .execute(&mut **tx)
            .await?;

        for (position, line) in (0_i32..).zip(lines) {
            query(CREATE_CART_ITEM_SQL)
                .bind(line.uuid)
                .bind(cart)
                .bind(line.product_uuid)
                .bind(line.attributes.color.as_deref())
                .bind(line.attributes.size.as_deref())
                .bind(line.attributes.material.as_deref())
                .bind(quantity_to_db(line.quantity, "quantity")?)
                .bind(amount_to_db(line.price, "price")?)
                .bind(amount_to_db(line.price_after_offer, "price_after_offer")?)
                .bind(amount_to_db(line.line_total, "line_total")?)
                .bind(line.applied_offer.as_ref().map(Json))
                .bind(Json(&line.upcoming_offers))
                .bind(position)
                .execute(&mut **tx)
                .await?;
        }

        Ok(())
    }
}

impl<'r> FromRow<'r, PgRow> for LineRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let applied_offer = row
            .try_get::<Option<Json<OfferSnapshot>>, _>("applied_offer")?
            .map(|Json(snapshot)| snapshot);

        let Json(upcoming_offers) = row.try_get::<Json<UpcomingOffers>, _>("upcoming_offers")?;

        Ok(Self(CartLine {
            uuid: row.try_get("uuid")?,
            product_uuid: row.try_get("product_uuid")?,
            attributes: LineAttributes {
                color: row.try_get("color")?,
                size: row.try_get("size")?,
                material: row.try_get("material")?,
            },
            quantity: try_get_quantity(row, "quantity")?,
            price: try_get_amount(row, "price")?,
            price_after_offer: try_get_amount(row, "price_after_offer")?,
            line_total: try_get_amount(row, "line_total")?,
            applied_offer,
            upcoming_offers,
        }))
    }
}
