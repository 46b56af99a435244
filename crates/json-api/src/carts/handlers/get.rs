//! Get Cart Handler

use jiff::Timestamp;
use salvo::prelude::*;

use crate::{
    carts::{errors::into_status_error, models::CartResponse},
    extensions::*,
};

/// Get Cart Handler
///
/// Reprices the caller's cart against current products and offers. Lines
/// whose product is gone or sold out are dropped and reported under
/// `removed_items`.
#[endpoint(
    tags("cart"),
    summary = "Get Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Cart"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, StatusError> {
    let principal = depot.principal_or_401()?;

    let cart = depot
        .app()?
        .carts
        .get_cart(principal.user_uuid, Timestamp::now())
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}
