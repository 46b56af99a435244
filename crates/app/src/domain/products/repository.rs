//! Products Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    database::{amount_to_db, quantity_to_db, try_get_amount, try_get_quantity},
    domain::products::models::{NewProduct, Product, ProductFilter, ProductUpdate, ProductUuid},
};

const LIST_PRODUCTS_SQL: &str = include_str!("sql/list_products.sql");
const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const GET_PRODUCTS_BY_UUIDS_SQL: &str = include_str!("sql/get_products_by_uuids.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const UPDATE_PRODUCT_SQL: &str = include_str!("sql/update_product.sql");
const DECREMENT_STOCK_SQL: &str = include_str!("sql/decrement_stock.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProductsRepository;

impl PgProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: ProductFilter,
    ) -> Result<Vec<Product>, sqlx::Error> {
        query_as::<Postgres, Product>(LIST_PRODUCTS_SQL)
            .bind(filter.category)
            .bind(filter.subcategory)
            .bind(filter.sub_subcategory)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<Product, sqlx::Error> {
        query_as::<Postgres, Product>(GET_PRODUCT_SQL)
            .bind(product)
            .fetch_one(&mut **tx)
            .await
    }

    /// Live products among `uuids`; missing or deleted ones are absent.
    pub(crate) async fn get_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuids: &[Uuid],
    ) -> Result<Vec<Product>, sqlx::Error> {
        if uuids.is_empty() {
            return Ok(Vec::new());
        }

        query_as::<Postgres, Product>(GET_PRODUCTS_BY_UUIDS_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: &NewProduct,
    ) -> Result<Product, sqlx::Error> {
        query_as::<Postgres, Product>(CREATE_PRODUCT_SQL)
            .bind(product.uuid)
            .bind(&product.name)
            .bind(product.description.as_deref())
            .bind(amount_to_db(product.price, "price")?)
            .bind(quantity_to_db(product.quantity, "quantity")?)
            .bind(product.category_uuid)
            .bind(product.subcategory_uuid)
            .bind(product.sub_subcategory_uuid)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        update: &ProductUpdate,
    ) -> Result<Product, sqlx::Error> {
        query_as::<Postgres, Product>(UPDATE_PRODUCT_SQL)
            .bind(product)
            .bind(&update.name)
            .bind(update.description.as_deref())
            .bind(amount_to_db(update.price, "price")?)
            .bind(quantity_to_db(update.quantity, "quantity")?)
            .fetch_one(&mut **tx)
            .await
    }

    /// Take `quantity` units out of stock. Returns `false` when there are
    /// not enough left.
    pub(crate) async fn decrement_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: Uuid,
        quantity: u32,
    ) -> Result<bool, sqlx::Error> {
        let rows_affected = query(DECREMENT_STOCK_SQL)
            .bind(product)
            .bind(quantity_to_db(quantity, "quantity")?)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected == 1)
    }
}

impl<'r> FromRow<'r, PgRow> for Product {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: row.try_get("uuid")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            price: try_get_amount(row, "price")?,
            quantity: try_get_quantity(row, "quantity")?,
            category_uuid: row.try_get("category_uuid")?,
            subcategory_uuid: row.try_get("subcategory_uuid")?,
            sub_subcategory_uuid: row.try_get("sub_subcategory_uuid")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
