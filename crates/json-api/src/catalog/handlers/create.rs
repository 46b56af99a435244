//! Create Catalog Entry Handler

use dukkan_app::domain::catalog::models::NewCatalogNode;
use salvo::{
    http::header::LOCATION,
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{catalog::errors::into_status_error, extensions::*};

use super::{CatalogNodeResponse, parse_kind};

/// Create Catalog Entry Request
#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub(crate) struct CreateCatalogNodeRequest {
    pub uuid: Uuid,

    /// Required below the category level
    pub parent_uuid: Option<Uuid>,

    #[validate(length(min = 1, max = 120))]
    pub name: String,
}

/// Create Catalog Entry Handler
#[endpoint(
    tags("catalog"),
    summary = "Create Catalog Entry",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Entry created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::FORBIDDEN, description = "Admin role required"),
        (status_code = StatusCode::CONFLICT, description = "Entry already exists"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    kind: PathParam<String>,
    json: JsonBody<CreateCatalogNodeRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CatalogNodeResponse>, StatusError> {
    depot.admin_or_403()?;

    let kind = parse_kind(&kind.into_inner())?;
    let request = json.validated()?;

    let node = depot
        .app()?
        .catalog
        .create_node(NewCatalogNode {
            uuid: request.uuid,
            kind,
            parent_uuid: request.parent_uuid,
            name: request.name,
        })
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/catalog/{kind}/{}", node.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(node.into()))
}
