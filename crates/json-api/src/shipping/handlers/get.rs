//! Get Shipping Options Handler

use salvo::{oapi::extract::PathParam, prelude::*};

use crate::{
    extensions::*,
    shipping::{errors::into_status_error, models::ShippingOptionsResponse},
};

/// Get Shipping Options Handler
#[endpoint(
    tags("shipping"),
    summary = "Get Shipping Options",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Delivery options for the city"),
        (status_code = StatusCode::NOT_FOUND, description = "No options for this city"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    city: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<ShippingOptionsResponse>, StatusError> {
    let city = city.into_inner();

    let options = depot
        .app()?
        .shipping
        .get_options(&city)
        .await
        .map_err(into_status_error)?;

    Ok(Json(ShippingOptionsResponse::new(city, options)))
}
