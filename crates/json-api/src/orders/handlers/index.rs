//! List Orders Handler

use salvo::prelude::*;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, models::OrderResponse},
};

/// List Orders Handler
///
/// The caller's orders, newest first.
#[endpoint(
    tags("orders"),
    summary = "List Orders",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order list"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<Vec<OrderResponse>>, StatusError> {
    let principal = depot.principal_or_401()?;

    let orders = depot
        .app()?
        .orders
        .list_orders(principal.user_uuid)
        .await
        .map_err(into_status_error)?;

    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use dukkan_app::domain::orders::{MockOrdersService, models::OrderUuid};
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{TEST_USER_UUID, app_context, customer_service, make_order};

    use super::*;

    #[tokio::test]
    async fn test_lists_callers_orders() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_list_orders()
            .once()
            .withf(|user| *user == TEST_USER_UUID)
            .return_once(|_| Ok(vec![make_order(OrderUuid::new()), make_order(OrderUuid::new())]));

        let mut app = app_context();
        app.orders = Arc::new(orders);

        let body: Vec<OrderResponse> = TestClient::get("http://example.com/orders")
            .send(&customer_service(app, Router::with_path("orders").get(handler)))
            .await
            .take_json()
            .await?;

        assert_eq!(body.len(), 2);
        assert_eq!(body[0].address.city, "Hawalli");
        assert_eq!(body[0].payment_method, "cod");

        Ok(())
    }
}
