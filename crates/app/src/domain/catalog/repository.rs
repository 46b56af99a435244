//! Catalog Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    database::try_get_parsed,
    domain::catalog::models::{CatalogKind, CatalogNode, NewCatalogNode},
};

const LIST_NODES_SQL: &str = include_str!("sql/list_nodes.sql");
const CREATE_CATEGORY_SQL: &str = include_str!("sql/create_category.sql");
const CREATE_SUBCATEGORY_SQL: &str = include_str!("sql/create_subcategory.sql");
const CREATE_SUB_SUBCATEGORY_SQL: &str = include_str!("sql/create_sub_subcategory.sql");
const DELETE_CATEGORIES_SQL: &str = include_str!("sql/delete_categories.sql");
const DELETE_SUBCATEGORIES_SQL: &str = include_str!("sql/delete_subcategories.sql");
const DELETE_SUB_SUBCATEGORIES_SQL: &str = include_str!("sql/delete_sub_subcategories.sql");
const DELETE_PRODUCTS_SQL: &str = include_str!("sql/delete_products.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCatalogRepository;

impl PgCatalogRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_nodes(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<CatalogNode>, sqlx::Error> {
        query_as::<Postgres, CatalogNode>(LIST_NODES_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    /// Insert a node under a live parent. Returns `None` when the parent is
    /// missing or deleted.
    pub(crate) async fn create_node(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        node: &NewCatalogNode,
    ) -> Result<Option<CatalogNode>, sqlx::Error> {
        let sql = match node.kind {
            CatalogKind::Category => {
                return query_as::<Postgres, CatalogNode>(CREATE_CATEGORY_SQL)
                    .bind(node.uuid)
                    .bind(&node.name)
                    .fetch_one(&mut **tx)
                    .await
                    .map(Some);
            }
            CatalogKind::Subcategory => CREATE_SUBCATEGORY_SQL,
            CatalogKind::SubSubcategory => CREATE_SUB_SUBCATEGORY_SQL,
            CatalogKind::Product => return Ok(None),
        };

        query_as::<Postgres, CatalogNode>(sql)
            .bind(node.uuid)
            .bind(node.parent_uuid)
            .bind(&node.name)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn delete_categories(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuids: &[Uuid],
    ) -> Result<Vec<Uuid>, sqlx::Error> {
        query_scalar(DELETE_CATEGORIES_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn delete_subcategories(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuids: &[Uuid],
        categories: &[Uuid],
    ) -> Result<Vec<Uuid>, sqlx::Error> {
        query_scalar(DELETE_SUBCATEGORIES_SQL)
            .bind(uuids)
            .bind(categories)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn delete_sub_subcategories(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuids: &[Uuid],
        subcategories: &[Uuid],
    ) -> Result<Vec<Uuid>, sqlx::Error> {
        query_scalar(DELETE_SUB_SUBCATEGORIES_SQL)
            .bind(uuids)
            .bind(subcategories)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn delete_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuids: &[Uuid],
        parents: &CascadeParents,
    ) -> Result<Vec<Uuid>, sqlx::Error> {
        query_scalar(DELETE_PRODUCTS_SQL)
            .bind(uuids)
            .bind(&parents.categories)
            .bind(&parents.subcategories)
            .bind(&parents.sub_subcategories)
            .fetch_all(&mut **tx)
            .await
    }
}

/// Ancestors already deleted by a cascade, used to reach their products.
#[derive(Debug, Clone, Default)]
pub(crate) struct CascadeParents {
    pub categories: Vec<Uuid>,
    pub subcategories: Vec<Uuid>,
    pub sub_subcategories: Vec<Uuid>,
}

impl<'r> FromRow<'r, PgRow> for CatalogNode {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: row.try_get("uuid")?,
            kind: try_get_parsed(row, "kind")?,
            parent_uuid: row.try_get("parent_uuid")?,
            name: row.try_get("name")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
