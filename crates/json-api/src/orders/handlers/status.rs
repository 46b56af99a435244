//! Change Order Status Handler

use dukkan_app::domain::orders::models::OrderUuid;
use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use tracing::info;
use uuid::Uuid;

use crate::{
    extensions::*,
    orders::{
        errors::into_status_error,
        models::{ChangeStatusRequest, OrderResponse},
    },
};

/// Change Order Status Handler
///
/// Moves an order along the fulfilment table. Refunds go through the
/// refund endpoint instead.
#[endpoint(
    tags("orders"),
    summary = "Change Order Status",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order updated"),
        (status_code = StatusCode::FORBIDDEN, description = "Admin role required"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::CONFLICT, description = "Transition not allowed"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    json: JsonBody<ChangeStatusRequest>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let admin = depot.admin_or_403()?;
    let status = json.into_inner().status;

    let order = depot
        .app()?
        .orders
        .change_status(OrderUuid::from_uuid(order.into_inner()), status)
        .await
        .map_err(into_status_error)?;

    info!(
        order_uuid = %order.uuid,
        status = %order.status,
        admin_uuid = %admin.user_uuid,
        "order status changed"
    );

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use dukkan::orders::{OrderStatus, TransitionError};
    use dukkan_app::domain::orders::{MockOrdersService, OrdersServiceError};
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use crate::test_helpers::{admin_service, app_context, customer_service, make_order};

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        let mut app = app_context();

        app.orders = Arc::new(orders);

        admin_service(app, Router::with_path("orders/{order}/status").put(handler))
    }

    #[tokio::test]
    async fn test_admin_confirms_order() -> TestResult {
        let uuid = OrderUuid::new();

        let mut orders = MockOrdersService::new();

        orders
            .expect_change_status()
            .once()
            .withf(move |u, status| *u == uuid && *status == OrderStatus::Confirmed)
            .return_once(move |_, status| {
                let mut order = make_order(uuid);
                order.status = status;

                Ok(order)
            });

        let url = format!("http://example.com/orders/{uuid}/status");

        let body: OrderResponse = TestClient::put(url)
            .json(&json!({ "status": "confirmed" }))
            .send(&make_service(orders))
            .await
            .take_json()
            .await?;

        assert_eq!(body.status, "confirmed");

        Ok(())
    }

    #[tokio::test]
    async fn test_forbidden_transition_returns_409() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_change_status().once().return_once(|_, to| {
            Err(OrdersServiceError::InvalidTransition(
                TransitionError::InvalidStatusChange {
                    from: OrderStatus::Delivered,
                    to,
                },
            ))
        });

        let res = TestClient::put(format!("http://example.com/orders/{}/status", Uuid::now_v7()))
            .json(&json!({ "status": "pending" }))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn test_customer_gets_403() -> TestResult {
        let res = TestClient::put(format!("http://example.com/orders/{}/status", Uuid::now_v7()))
            .json(&json!({ "status": "confirmed" }))
            .send(&customer_service(
                app_context(),
                Router::with_path("orders/{order}/status").put(handler),
            ))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
