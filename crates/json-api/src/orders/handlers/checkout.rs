//! Checkout Handler

use jiff::Timestamp;
use salvo::{http::header::LOCATION, oapi::extract::JsonBody, prelude::*};
use tracing::info;

use crate::{
    extensions::*,
    orders::{
        errors::into_status_error,
        models::{CheckoutBody, OrderResponse},
    },
};

/// Checkout Handler
///
/// Turns the caller's cart into an order. Card orders come back with a
/// `payment.payment_url` to send the customer to; cash orders are complete.
#[endpoint(
    tags("orders"),
    summary = "Checkout",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Checkout rejected"),
        (status_code = StatusCode::CONFLICT, description = "Not enough stock"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Payment gateway failed"),
        (status_code = StatusCode::GATEWAY_TIMEOUT, description = "Payment gateway timed out"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CheckoutBody>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderResponse>, StatusError> {
    let principal = depot.principal_or_401()?;
    let body = json.validated()?;

    let order = depot
        .app()?
        .orders
        .checkout(principal.user_uuid, body.into(), Timestamp::now())
        .await
        .map_err(into_status_error)?;

    info!(
        order_uuid = %order.uuid,
        payment_method = %order.payment_method,
        total = order.total,
        "order placed"
    );

    res.add_header(LOCATION, format!("/orders/{}", order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use dukkan::payments::PaymentMethod;
    use dukkan_app::domain::{
        addresses::models::AddressUuid,
        orders::{MockOrdersService, OrdersServiceError, models::OrderUuid},
    };
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;
    use uuid::Uuid;

    use crate::test_helpers::{TEST_USER_UUID, app_context, customer_service, make_order};

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        let mut app = app_context();

        app.orders = Arc::new(orders);

        customer_service(app, Router::with_path("checkout").post(handler))
    }

    #[tokio::test]
    async fn test_card_checkout_returns_payment_url() -> TestResult {
        let address = Uuid::now_v7();

        let mut orders = MockOrdersService::new();

        orders
            .expect_checkout()
            .once()
            .withf(move |user, request, _| {
                *user == TEST_USER_UUID
                    && request.address_uuid == AddressUuid::from_uuid(address)
                    && request.payment_method == PaymentMethod::Visa
                    && request.coupon_code.is_none()
            })
            .return_once(|_, _, _| {
                let mut order = make_order(OrderUuid::new());

                order.payment_method = PaymentMethod::Visa;
                order.payment.invoice_id = Some("inv-1".to_owned());
                order.payment.payment_url = Some("https://pay.example.com/inv-1".to_owned());

                Ok(order)
            });

        let mut res = TestClient::post("http://example.com/checkout")
            .json(&json!({ "address_uuid": address, "payment_method": "visa" }))
            .send(&make_service(orders))
            .await;

        let body: OrderResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(
            body.payment.payment_url.as_deref(),
            Some("https://pay.example.com/inv-1")
        );
        assert_eq!(body.status, "pending");

        Ok(())
    }

    #[tokio::test]
    async fn test_empty_cart_returns_400() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_checkout()
            .once()
            .return_once(|_, _, _| Err(OrdersServiceError::EmptyCart));

        let res = TestClient::post("http://example.com/checkout")
            .json(&json!({ "address_uuid": Uuid::now_v7(), "payment_method": "cod" }))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_rejected_coupon_returns_400() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_checkout().once().return_once(|_, _, _| {
            Err(OrdersServiceError::CouponRejected(
                "This coupon is no longer active".to_owned(),
            ))
        });

        let res = TestClient::post("http://example.com/checkout")
            .json(&json!({
                "address_uuid": Uuid::now_v7(),
                "payment_method": "cod",
                "coupon_code": "OLD",
            }))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_payment_method_returns_400() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_checkout().never();

        let res = TestClient::post("http://example.com/checkout")
            .json(&json!({ "address_uuid": Uuid::now_v7(), "payment_method": "knet" }))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
