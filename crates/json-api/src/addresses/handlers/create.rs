//! Create Address Handler

use dukkan_app::domain::addresses::models::{AddressUuid, NewAddress};
use salvo::{http::header::LOCATION, oapi::extract::JsonBody, prelude::*};

use crate::{
    addresses::{
        errors::into_status_error,
        models::{AddressBody, AddressResponse},
    },
    extensions::*,
};

/// Create Address Handler
#[endpoint(
    tags("addresses"),
    summary = "Create Address",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Address created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<AddressBody>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<AddressResponse>, StatusError> {
    let principal = depot.principal_or_401()?;
    let body = json.validated()?;

    let address = depot
        .app()?
        .addresses
        .create_address(
            principal.user_uuid,
            NewAddress {
                uuid: AddressUuid::new(),
                fields: body.into(),
            },
        )
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/addresses/{}", address.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(address.into()))
}
