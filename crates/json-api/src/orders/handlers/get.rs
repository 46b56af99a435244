//! Get Order Handler

use dukkan_app::domain::orders::models::OrderUuid;
use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, models::OrderResponse},
};

/// Get Order Handler
///
/// Owners see their own orders; admins see any order.
#[endpoint(
    tags("orders"),
    summary = "Get Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order"),
        (status_code = StatusCode::FORBIDDEN, description = "Order belongs to another user"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let principal = depot.principal_or_401()?;

    let order = depot
        .app()?
        .orders
        .get_order(principal, OrderUuid::from_uuid(order.into_inner()))
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use dukkan_app::domain::orders::{MockOrdersService, OrdersServiceError};
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{CUSTOMER, app_context, customer_service, make_order};

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        let mut app = app_context();

        app.orders = Arc::new(orders);

        customer_service(app, Router::with_path("orders/{order}").get(handler))
    }

    #[tokio::test]
    async fn test_owner_gets_order() -> TestResult {
        let uuid = OrderUuid::new();

        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .withf(move |principal, u| *principal == CUSTOMER && *u == uuid)
            .return_once(move |_, _| Ok(make_order(uuid)));

        let body: OrderResponse = TestClient::get(format!("http://example.com/orders/{uuid}"))
            .send(&make_service(orders))
            .await
            .take_json()
            .await?;

        assert_eq!(body.uuid, uuid.into_uuid());
        assert_eq!(body.total, 10_000);

        Ok(())
    }

    #[tokio::test]
    async fn test_foreign_order_returns_403() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::Forbidden));

        let res = TestClient::get(format!("http://example.com/orders/{}", Uuid::now_v7()))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
