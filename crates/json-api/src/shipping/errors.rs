//! Errors

use dukkan_app::domain::shipping::ShippingServiceError;
use salvo::http::StatusError;
use tracing::error;

pub(crate) fn into_status_error(error: ShippingServiceError) -> StatusError {
    match error {
        ShippingServiceError::NotFound => {
            StatusError::not_found().brief("No shipping options for this city")
        }
        ShippingServiceError::Validation(reason) => StatusError::bad_request().brief(reason),
        ShippingServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid shipping options")
        }
        ShippingServiceError::Timeout => {
            error!("shipping storage timed out");

            StatusError::gateway_timeout()
        }
        ShippingServiceError::Sql(source) => {
            error!("shipping storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
