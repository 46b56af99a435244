//! Errors

use dukkan_app::domain::{orders::OrdersServiceError, payments::GatewayError};
use salvo::http::StatusError;
use tracing::{error, warn};

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::NotFound => StatusError::not_found().brief("Order not found"),
        OrdersServiceError::Forbidden => {
            StatusError::forbidden().brief("Order belongs to another user")
        }
        OrdersServiceError::AddressNotFound => {
            StatusError::bad_request().brief("Address not found")
        }
        OrdersServiceError::EmptyCart => StatusError::bad_request().brief("Cart is empty"),
        OrdersServiceError::CouponRejected(message) => StatusError::bad_request().brief(message),
        error @ OrdersServiceError::InsufficientStock { .. } => {
            StatusError::conflict().brief(error.to_string())
        }
        OrdersServiceError::InvalidTransition(source) => {
            StatusError::conflict().brief(source.to_string())
        }
        OrdersServiceError::InvalidData => StatusError::bad_request().brief("Invalid order data"),
        OrdersServiceError::Gateway(GatewayError::Timeout) => {
            warn!("payment gateway timed out during checkout");

            StatusError::gateway_timeout().brief("Payment gateway timed out")
        }
        OrdersServiceError::Gateway(GatewayError::Rejected(reason)) => {
            StatusError::bad_gateway()
                .brief(format!("Payment gateway rejected the order: {reason}"))
        }
        OrdersServiceError::Gateway(source) => {
            error!("payment gateway failed during checkout: {source}");

            StatusError::bad_gateway().brief("Payment gateway unavailable")
        }
        OrdersServiceError::Pricing(source) => {
            error!("failed to price order: {source}");

            StatusError::internal_server_error()
        }
        OrdersServiceError::Timeout => {
            error!("orders storage timed out");

            StatusError::gateway_timeout()
        }
        OrdersServiceError::Sql(source) => {
            error!("orders storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
