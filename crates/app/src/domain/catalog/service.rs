//! Catalog service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;
use uuid::Uuid;

use crate::{
    database::Db,
    domain::catalog::{
        errors::CatalogServiceError,
        models::{CascadeSummary, CatalogKind, CatalogNode, NewCatalogNode},
        repository::{CascadeParents, PgCatalogRepository},
    },
};

#[derive(Debug, Clone)]
pub struct PgCatalogService {
    db: Db,
    repository: PgCatalogRepository,
}

impl PgCatalogService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCatalogRepository::new(),
        }
    }
}

fn count(rows: &[Uuid]) -> u64 {
    u64::try_from(rows.len()).unwrap_or(u64::MAX)
}

#[async_trait]
impl CatalogService for PgCatalogService {
    async fn list_nodes(&self) -> Result<Vec<CatalogNode>, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let nodes = self.repository.list_nodes(&mut tx).await?;

        tx.commit().await?;

        Ok(nodes)
    }

    #[tracing::instrument(
        name = "catalog.service.create_node",
        skip(self, node),
        fields(kind = %node.kind, uuid = %node.uuid),
        err
    )]
    async fn create_node(&self, node: NewCatalogNode) -> Result<CatalogNode, CatalogServiceError> {
        match (node.kind, node.parent_uuid) {
            (CatalogKind::Product, _) => {
                return Err(CatalogServiceError::Validation(
                    "products are created through the products api".to_owned(),
                ));
            }
            (CatalogKind::Category, Some(_)) => {
                return Err(CatalogServiceError::Validation(
                    "categories have no parent".to_owned(),
                ));
            }
            (CatalogKind::Subcategory | CatalogKind::SubSubcategory, None) => {
                return Err(CatalogServiceError::Validation(format!(
                    "a {} needs a parent",
                    node.kind
                )));
            }
            _ => {}
        }

        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_node(&mut tx, &node)
            .await?
            .ok_or(CatalogServiceError::InvalidReference)?;

        tx.commit().await?;

        Ok(created)
    }

    #[tracing::instrument(name = "catalog.service.cascade_delete", skip(self), err)]
    async fn cascade_delete(
        &self,
        kind: CatalogKind,
        uuid: Uuid,
    ) -> Result<CascadeSummary, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let root = [uuid];
        let pick = |level: CatalogKind| if kind == level { &root[..] } else { &[][..] };

        let categories = if kind == CatalogKind::Category {
            self.repository.delete_categories(&mut tx, &root).await?
        } else {
            Vec::new()
        };

        let subcategories = if matches!(kind, CatalogKind::Category | CatalogKind::Subcategory) {
            self.repository
                .delete_subcategories(&mut tx, pick(CatalogKind::Subcategory), &categories)
                .await?
        } else {
            Vec::new()
        };

        let sub_subcategories = if kind == CatalogKind::Product {
            Vec::new()
        } else {
            self.repository
                .delete_sub_subcategories(
                    &mut tx,
                    pick(CatalogKind::SubSubcategory),
                    &subcategories,
                )
                .await?
        };

        let parents = CascadeParents {
            categories,
            subcategories,
            sub_subcategories,
        };

        let products = self
            .repository
            .delete_products(&mut tx, pick(CatalogKind::Product), &parents)
            .await?;

        let summary = CascadeSummary {
            categories: count(&parents.categories),
            subcategories: count(&parents.subcategories),
            sub_subcategories: count(&parents.sub_subcategories),
            products: count(&products),
        };

        let root_deleted = match kind {
            CatalogKind::Category => summary.categories,
            CatalogKind::Subcategory => summary.subcategories,
            CatalogKind::SubSubcategory => summary.sub_subcategories,
            CatalogKind::Product => summary.products,
        };

        if root_deleted == 0 {
            return Err(CatalogServiceError::NotFound);
        }

        tx.commit().await?;

        info!(
            categories = summary.categories,
            subcategories = summary.subcategories,
            sub_subcategories = summary.sub_subcategories,
            products = summary.products,
            "cascade delete finished"
        );

        Ok(summary)
    }
}

#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Every live category, subcategory and sub-subcategory.
    async fn list_nodes(&self) -> Result<Vec<CatalogNode>, CatalogServiceError>;

    /// Creates a category-level node under a live parent.
    async fn create_node(&self, node: NewCatalogNode) -> Result<CatalogNode, CatalogServiceError>;

    /// Soft-deletes an entry and everything beneath it in one transaction.
    async fn cascade_delete(
        &self,
        kind: CatalogKind,
        uuid: Uuid,
    ) -> Result<CascadeSummary, CatalogServiceError>;
}
