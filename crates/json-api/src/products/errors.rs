//! Errors

use dukkan_app::domain::products::ProductsServiceError;
use salvo::http::StatusError;
use tracing::error;

pub(crate) fn into_status_error(error: ProductsServiceError) -> StatusError {
    match error {
        ProductsServiceError::NotFound => StatusError::not_found().brief("Product not found"),
        ProductsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Product already exists")
        }
        ProductsServiceError::InvalidReference => {
            StatusError::bad_request().brief("Unknown category, subcategory or sub-subcategory")
        }
        ProductsServiceError::MissingRequiredData | ProductsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid product payload")
        }
        ProductsServiceError::Pricing(source) => {
            error!("failed to price product: {source}");

            StatusError::internal_server_error()
        }
        ProductsServiceError::Timeout => {
            error!("products storage timed out");

            StatusError::gateway_timeout()
        }
        ProductsServiceError::Sql(source) => {
            error!("products storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
