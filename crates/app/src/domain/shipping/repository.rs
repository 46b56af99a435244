//! Shipping Repository

use dukkan::shipping::ShippingOption;
use sqlx::{Postgres, Row, Transaction, postgres::PgRow, query};

use crate::database::{amount_to_db, try_get_amount, try_get_parsed};

const LIST_OPTIONS_SQL: &str = include_str!("sql/list_options.sql");
const DELETE_OPTIONS_SQL: &str = include_str!("sql/delete_options.sql");
const INSERT_OPTION_SQL: &str = include_str!("sql/insert_option.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgShippingRepository;

impl PgShippingRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_options(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        city: &str,
    ) -> Result<Vec<ShippingOption>, sqlx::Error> {
        query(LIST_OPTIONS_SQL)
            .bind(city)
            .try_map(|row: PgRow| decode_option(&row))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn replace_options(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        city: &str,
        options: &[ShippingOption],
    ) -> Result<(), sqlx::Error> {
        query(DELETE_OPTIONS_SQL).bind(city).execute(&mut **tx).await?;

        for option in options {
            query(INSERT_OPTION_SQL)
                .bind(city)
                .bind(option.shipping_type.as_str())
                .bind(amount_to_db(option.cost, "cost")?)
                .bind(option.delivery_time.as_deref())
                .bind(option.is_active)
                .execute(&mut **tx)
                .await?;
        }

        Ok(())
    }
}

fn decode_option(row: &PgRow) -> Result<ShippingOption, sqlx::Error> {
    Ok(ShippingOption {
        shipping_type: try_get_parsed(row, "shipping_type")?,
        cost: try_get_amount(row, "cost")?,
        delivery_time: row.try_get("delivery_time")?,
        is_active: row.try_get("is_active")?,
    })
}
