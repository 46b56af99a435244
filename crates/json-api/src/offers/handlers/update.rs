//! Update Offer Handler

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use crate::{
    extensions::*,
    offers::{
        errors::into_status_error,
        models::{OfferRequest, OfferResponse},
    },
};

/// Update Offer Handler
///
/// Replaces every editable field of the offer.
#[endpoint(
    tags("offers"),
    summary = "Update Offer",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Offer updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::FORBIDDEN, description = "Admin role required"),
        (status_code = StatusCode::NOT_FOUND, description = "Offer not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    offer: PathParam<Uuid>,
    json: JsonBody<OfferRequest>,
    depot: &mut Depot,
) -> Result<Json<OfferResponse>, StatusError> {
    depot.admin_or_403()?;

    let details = json.validated()?.into_details()?;

    let offer = depot
        .app()?
        .offers
        .update_offer(offer.into_inner(), details)
        .await
        .map_err(into_status_error)?;

    Ok(Json(offer.into()))
}
