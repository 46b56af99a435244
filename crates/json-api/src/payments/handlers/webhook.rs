//! Payment Webhook Handler

use dukkan_app::domain::payments::SIGNATURE_HEADER;
use jiff::Timestamp;
use salvo::prelude::*;
use tracing::{info, warn};

use crate::{
    extensions::*,
    observability::observe_webhook,
    payments::{errors::into_status_error, models::WebhookResponse},
};

/// Payment Webhook Handler
///
/// Verifies the signature over the raw body and applies the reported
/// payment status. Redeliveries leave the order unchanged. Signed deliveries
/// that cannot be applied, such as unknown invoices, are acknowledged so the
/// gateway stops retrying them.
#[endpoint(
    tags("payments"),
    summary = "Payment Webhook",
    responses(
        (status_code = StatusCode::OK, description = "Delivery accepted or ignored"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unreadable body"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid signature"),
    ),
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<WebhookResponse>, StatusError> {
    let Some(signature) = req.header::<String>(SIGNATURE_HEADER) else {
        warn!("payment webhook without signature");
        observe_webhook("rejected");

        return Err(StatusError::unauthorized().brief("Missing webhook signature"));
    };

    let body = req
        .payload()
        .await
        .map_err(|source| {
            StatusError::bad_request()
                .brief("Unreadable webhook body")
                .detail(source.to_string())
        })?
        .clone();

    let outcome = depot
        .app()?
        .payments
        .handle_webhook(&body, &signature, Timestamp::now())
        .await;

    match outcome {
        Ok(Some(order)) => {
            observe_webhook("applied");
            info!(
                order_uuid = %order.uuid,
                payment_status = %order.payment.status,
                "payment webhook applied"
            );

            Ok(Json(Some(order).into()))
        }
        Ok(None) => {
            observe_webhook("ignored");

            Ok(Json(WebhookResponse::default()))
        }
        Err(error) => {
            observe_webhook("rejected");

            Err(into_status_error(error))
        }
    }
}
