//! Errors

use dukkan_app::domain::addresses::AddressesServiceError;
use salvo::http::StatusError;
use tracing::error;

pub(crate) fn into_status_error(error: AddressesServiceError) -> StatusError {
    match error {
        AddressesServiceError::AlreadyExists => {
            StatusError::conflict().brief("Address already exists")
        }
        AddressesServiceError::NotFound => StatusError::not_found().brief("Address not found"),
        AddressesServiceError::MissingRequiredData => {
            StatusError::bad_request().brief("Invalid address payload")
        }
        AddressesServiceError::Timeout => {
            error!("addresses storage timed out");

            StatusError::gateway_timeout()
        }
        AddressesServiceError::Sql(source) => {
            error!("addresses storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
