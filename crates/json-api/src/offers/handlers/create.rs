//! Create Offer Handler

use dukkan_app::domain::offers::models::NewOffer;
use salvo::{http::header::LOCATION, oapi::extract::JsonBody, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    offers::{
        errors::into_status_error,
        models::{OfferRequest, OfferResponse},
    },
};

/// Create Offer Handler
#[endpoint(
    tags("offers"),
    summary = "Create Offer",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Offer created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::FORBIDDEN, description = "Admin role required"),
        (status_code = StatusCode::CONFLICT, description = "Coupon code already in use"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<OfferRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OfferResponse>, StatusError> {
    depot.admin_or_403()?;

    let details = json.validated()?.into_details()?;

    let offer = depot
        .app()?
        .offers
        .create_offer(NewOffer {
            uuid: Uuid::now_v7(),
            details,
        })
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/offers/{}", offer.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(offer.into()))
}
