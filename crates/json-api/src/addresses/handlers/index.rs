//! List Addresses Handler

use salvo::prelude::*;

use crate::{
    addresses::{errors::into_status_error, models::AddressResponse},
    extensions::*,
};

/// List Addresses Handler
///
/// The caller's saved delivery addresses.
#[endpoint(
    tags("addresses"),
    summary = "List Addresses",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Address list"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<Vec<AddressResponse>>, StatusError> {
    let principal = depot.principal_or_401()?;

    let addresses = depot
        .app()?
        .addresses
        .list_addresses(principal.user_uuid)
        .await
        .map_err(into_status_error)?;

    Ok(Json(addresses.into_iter().map(AddressResponse::from).collect()))
}
