//! Add Cart Item Handler

use jiff::Timestamp;
use salvo::{oapi::extract::JsonBody, prelude::*};

use crate::{
    carts::{
        errors::into_status_error,
        models::{AddItemRequest, CartResponse},
    },
    extensions::*,
};

/// Add Cart Item Handler
///
/// Adds units of a product variant. A line with the same product and
/// attributes has its quantity increased instead.
#[endpoint(
    tags("cart"),
    summary = "Add Cart Item",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Updated cart"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::CONFLICT, description = "Not enough stock"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<AddItemRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let principal = depot.principal_or_401()?;
    let request = json.validated()?;

    let cart = depot
        .app()?
        .carts
        .add_item(principal.user_uuid, request.into(), Timestamp::now())
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}
