//! Refund Order Handler

use dukkan_app::domain::orders::models::OrderUuid;
use jiff::Timestamp;
use salvo::{oapi::extract::PathParam, prelude::*};
use tracing::info;
use uuid::Uuid;

use crate::{extensions::*, orders::models::OrderResponse, payments::errors::into_status_error};

/// Refund Order Handler
///
/// Refunds a paid card order in full through the payment gateway.
#[endpoint(
    tags("orders"),
    summary = "Refund Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order refunded"),
        (status_code = StatusCode::FORBIDDEN, description = "Admin role required"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::CONFLICT, description = "Payment is not refundable"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Payment gateway failed"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let admin = depot.admin_or_403()?;

    let order = depot
        .app()?
        .payments
        .refund(OrderUuid::from_uuid(order.into_inner()), Timestamp::now())
        .await
        .map_err(into_status_error)?;

    info!(
        order_uuid = %order.uuid,
        admin_uuid = %admin.user_uuid,
        amount = order.total,
        "order refunded"
    );

    Ok(Json(order.into()))
}
