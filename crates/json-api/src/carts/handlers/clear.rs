//! Clear Cart Handler

use salvo::prelude::*;

use crate::{carts::errors::into_status_error, extensions::*};

/// Clear Cart Handler
#[endpoint(
    tags("cart"),
    summary = "Clear Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Cart deleted"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot, res: &mut Response) -> Result<(), StatusError> {
    let principal = depot.principal_or_401()?;

    depot
        .app()?
        .carts
        .clear_cart(principal.user_uuid)
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::NO_CONTENT);

    Ok(())
}
