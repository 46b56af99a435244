//! List Catalog Handler

use salvo::prelude::*;

use crate::{catalog::errors::into_status_error, extensions::*};

use super::CatalogNodeResponse;

/// List Catalog Handler
///
/// Every live category, subcategory and sub-subcategory. Clients rebuild
/// the tree from `parent_uuid`.
#[endpoint(
    tags("catalog"),
    summary = "List Catalog",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Catalog entries"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    depot: &mut Depot,
) -> Result<Json<Vec<CatalogNodeResponse>>, StatusError> {
    let nodes = depot
        .app()?
        .catalog
        .list_nodes()
        .await
        .map_err(into_status_error)?;

    Ok(Json(nodes.into_iter().map(CatalogNodeResponse::from).collect()))
}
