//! Catalog Models

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Level of the catalog hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    Category,
    Subcategory,
    SubSubcategory,
    Product,
}

impl CatalogKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Subcategory => "subcategory",
            Self::SubSubcategory => "sub_subcategory",
            Self::Product => "product",
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown catalog kind: {0}")]
pub struct UnknownCatalogKind(pub String);

impl FromStr for CatalogKind {
    type Err = UnknownCatalogKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "category" => Ok(Self::Category),
            "subcategory" => Ok(Self::Subcategory),
            "sub_subcategory" => Ok(Self::SubSubcategory),
            "product" => Ok(Self::Product),
            other => Err(UnknownCatalogKind(other.to_owned())),
        }
    }
}

/// A category, subcategory or sub-subcategory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogNode {
    pub uuid: Uuid,
    pub kind: CatalogKind,
    pub parent_uuid: Option<Uuid>,
    pub name: String,
    pub created_at: Timestamp,
}

/// New category-level node. `parent_uuid` is required below the top level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCatalogNode {
    pub uuid: Uuid,
    pub kind: CatalogKind,
    pub parent_uuid: Option<Uuid>,
    pub name: String,
}

/// Rows soft-deleted per level by a cascading delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeSummary {
    pub categories: u64,
    pub subcategories: u64,
    pub sub_subcategories: u64,
    pub products: u64,
}
