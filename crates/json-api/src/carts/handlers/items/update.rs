//! Update Cart Item Handler

use jiff::Timestamp;
use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use crate::{
    carts::{
        errors::into_status_error,
        models::{CartResponse, UpdateItemRequest},
    },
    extensions::*,
};

/// Update Cart Item Handler
#[endpoint(
    tags("cart"),
    summary = "Update Cart Item",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Updated cart"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart item not found"),
        (status_code = StatusCode::CONFLICT, description = "Not enough stock"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    item: PathParam<Uuid>,
    json: JsonBody<UpdateItemRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let principal = depot.principal_or_401()?;
    let request = json.validated()?;

    let cart = depot
        .app()?
        .carts
        .update_item_quantity(
            principal.user_uuid,
            item.into_inner(),
            request.quantity,
            Timestamp::now(),
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}
