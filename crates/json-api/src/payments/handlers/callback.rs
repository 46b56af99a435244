//! Payment Callback Handlers
//!
//! The hosted payment page sends the customer back to one of these with the
//! gateway's `paymentId`. The status is always re-read from the gateway, so
//! the query string alone cannot mark an order paid.

use dukkan_app::domain::payments::CallbackKind;
use jiff::Timestamp;
use salvo::prelude::*;
use tracing::info;

use crate::{extensions::*, orders::OrderResponse, payments::errors::into_status_error};

const PAYMENT_ID: &str = "paymentId";

async fn apply(
    req: &mut Request,
    depot: &mut Depot,
    kind: CallbackKind,
) -> Result<OrderResponse, StatusError> {
    let payment_id: String = req
        .query(PAYMENT_ID)
        .ok_or_else(|| StatusError::bad_request().brief("paymentId is required"))?;

    let order = depot
        .app()?
        .payments
        .handle_callback(&payment_id, kind, Timestamp::now())
        .await
        .map_err(into_status_error)?;

    info!(
        order_uuid = %order.uuid,
        payment_status = %order.payment.status,
        ?kind,
        "payment callback applied"
    );

    Ok(order.into())
}

/// Payment Success Callback
#[endpoint(
    tags("payments"),
    summary = "Payment Success Callback",
    parameters(("paymentId" = String, Query, description = "Gateway payment id")),
    responses(
        (status_code = StatusCode::OK, description = "Order after the payment report"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing payment id"),
        (status_code = StatusCode::NOT_FOUND, description = "No order for this payment"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Payment gateway failed"),
    ),
)]
pub(crate) async fn success(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    apply(req, depot, CallbackKind::Success).await.map(Json)
}

/// Payment Error Callback
///
/// A payment still pending at this point is recorded as failed.
#[endpoint(
    tags("payments"),
    summary = "Payment Error Callback",
    parameters(("paymentId" = String, Query, description = "Gateway payment id")),
    responses(
        (status_code = StatusCode::OK, description = "Order after the payment report"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing payment id"),
        (status_code = StatusCode::NOT_FOUND, description = "No order for this payment"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Payment gateway failed"),
    ),
)]
pub(crate) async fn failure(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    apply(req, depot, CallbackKind::Error).await.map(Json)
}
