//! Errors

use dukkan_app::domain::carts::CartsServiceError;
use salvo::http::StatusError;
use tracing::error;

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::NotFound => StatusError::not_found().brief("Cart not found"),
        CartsServiceError::ItemNotFound => StatusError::not_found().brief("Cart item not found"),
        CartsServiceError::ProductNotFound => StatusError::not_found().brief("Product not found"),
        CartsServiceError::InvalidQuantity => {
            StatusError::bad_request().brief("Quantity must be at least 1")
        }
        error @ CartsServiceError::InsufficientStock { .. } => {
            StatusError::conflict().brief(error.to_string())
        }
        CartsServiceError::InvalidReference => {
            StatusError::bad_request().brief("Unknown product")
        }
        CartsServiceError::Pricing(source) => {
            error!("failed to price cart: {source}");

            StatusError::internal_server_error()
        }
        CartsServiceError::Timeout => {
            error!("carts storage timed out");

            StatusError::gateway_timeout()
        }
        CartsServiceError::Sql(source) => {
            error!("carts storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
