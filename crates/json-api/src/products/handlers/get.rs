//! Get Product Handler

use dukkan_app::domain::products::models::ProductUuid;
use jiff::Timestamp;
use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    products::{errors::into_status_error, models::ProductResponse},
};

/// Get Product Handler
#[endpoint(
    tags("products"),
    summary = "Get Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Product"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, StatusError> {
    let product = depot
        .app()?
        .products
        .get_product(ProductUuid::from_uuid(product.into_inner()), Timestamp::now())
        .await
        .map_err(into_status_error)?;

    Ok(Json(product.into()))
}
