//! List Offers Handler

use salvo::prelude::*;

use crate::{
    extensions::*,
    offers::{errors::into_status_error, models::OfferResponse},
};

/// List Offers Handler
///
/// Every offer that has not been deleted, highest precedence first.
#[endpoint(
    tags("offers"),
    summary = "List Offers",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Offer list"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<Vec<OfferResponse>>, StatusError> {
    let offers = depot
        .app()?
        .offers
        .list_offers()
        .await
        .map_err(into_status_error)?;

    Ok(Json(offers.into_iter().map(OfferResponse::from).collect()))
}
