//! Catalog Handlers

use dukkan_app::domain::catalog::models::{CatalogKind, CatalogNode};
use salvo::{oapi::ToSchema, prelude::StatusError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::extensions::*;

pub(crate) mod create;
pub(crate) mod delete;
pub(crate) mod index;

/// Catalog Node Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CatalogNodeResponse {
    pub uuid: Uuid,

    /// `category`, `subcategory` or `sub_subcategory`
    pub kind: String,

    /// Entry one level up; absent for categories
    pub parent_uuid: Option<Uuid>,

    pub name: String,

    pub created_at: String,
}

impl From<CatalogNode> for CatalogNodeResponse {
    fn from(node: CatalogNode) -> Self {
        Self {
            uuid: node.uuid,
            kind: node.kind.to_string(),
            parent_uuid: node.parent_uuid,
            name: node.name,
            created_at: node.created_at.to_string(),
        }
    }
}

fn parse_kind(kind: &str) -> Result<CatalogKind, StatusError> {
    kind.parse::<CatalogKind>().or_400("Unknown catalog level")
}
