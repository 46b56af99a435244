//! Errors

use dukkan_app::domain::payments::{GatewayError, PaymentsServiceError};
use salvo::http::StatusError;
use tracing::{error, warn};

pub(crate) fn into_status_error(error: PaymentsServiceError) -> StatusError {
    match error {
        PaymentsServiceError::NotFound => StatusError::not_found().brief("Order not found"),
        PaymentsServiceError::Conflict(source) => StatusError::conflict().brief(source.to_string()),
        PaymentsServiceError::MissingInvoice => {
            StatusError::conflict().brief("Order has no gateway invoice")
        }
        PaymentsServiceError::Gateway(GatewayError::Rejected(reason)) => {
            StatusError::bad_gateway()
                .brief(format!("Payment gateway rejected the request: {reason}"))
        }
        PaymentsServiceError::Gateway(source) => {
            error!("payment gateway failed: {source}");

            StatusError::bad_gateway().brief("Payment gateway unavailable")
        }
        PaymentsServiceError::GatewayTimeout => {
            warn!("payment gateway timed out");

            StatusError::gateway_timeout().brief("Payment gateway timed out")
        }
        PaymentsServiceError::InvalidSignature(source) => {
            warn!("rejected payment webhook: {source}");

            StatusError::unauthorized().brief("Invalid webhook signature")
        }
        PaymentsServiceError::InvalidPayload => {
            StatusError::bad_request().brief("Invalid webhook payload")
        }
        PaymentsServiceError::Timeout => {
            error!("payments storage timed out");

            StatusError::gateway_timeout()
        }
        PaymentsServiceError::Sql(source) => {
            error!("payments storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
