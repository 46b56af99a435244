//! Errors

use dukkan_app::domain::offers::OffersServiceError;
use salvo::http::StatusError;
use tracing::error;

pub(crate) fn into_status_error(error: OffersServiceError) -> StatusError {
    match error {
        OffersServiceError::NotFound => StatusError::not_found().brief("Offer not found"),
        OffersServiceError::AlreadyExists => {
            StatusError::conflict().brief("Offer or coupon code already exists")
        }
        OffersServiceError::Validation(reason) => StatusError::bad_request().brief(reason),
        OffersServiceError::MissingRequiredData | OffersServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid offer payload")
        }
        OffersServiceError::Timeout => {
            error!("offers storage timed out");

            StatusError::gateway_timeout()
        }
        OffersServiceError::Sql(source) => {
            error!("offers storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
