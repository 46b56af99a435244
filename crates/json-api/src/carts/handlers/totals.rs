//! Cart Totals Handler

use jiff::Timestamp;
use salvo::{oapi::extract::JsonBody, prelude::*};

use crate::{
    carts::models::{CartTotalsRequest, CartTotalsResponse},
    extensions::*,
    orders::errors::into_status_error,
};

/// Cart Totals Handler
///
/// Previews what checkout would charge for the current cart: coupon,
/// cart-wide offers and shipping for the given city. Nothing is stored.
#[endpoint(
    tags("cart"),
    summary = "Preview Cart Totals",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Totals preview"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CartTotalsRequest>,
    depot: &mut Depot,
) -> Result<Json<CartTotalsResponse>, StatusError> {
    let principal = depot.principal_or_401()?;
    let request = json.validated()?;

    let totals = depot
        .app()?
        .orders
        .preview_totals(principal.user_uuid, request.into(), Timestamp::now())
        .await
        .map_err(into_status_error)?;

    Ok(Json(totals.into()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use dukkan::{
        orders::{CouponOutcome, OrderTotals},
        shipping::ShippingType,
    };
    use dukkan_app::domain::orders::MockOrdersService;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use crate::test_helpers::{app_context, customer_service};

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        let mut app = app_context();

        app.orders = Arc::new(orders);

        customer_service(app, Router::with_path("cart/totals").post(handler))
    }

    #[tokio::test]
    async fn test_preview_reports_coupon_and_shipping() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_preview_totals()
            .once()
            .withf(|_, request, _| {
                request.city == "Hawalli"
                    && request.shipping_type == Some(ShippingType::Express)
                    && request.coupon_code.as_deref() == Some("SAVE10")
            })
            .return_once(|_, _, _| {
                Ok(OrderTotals {
                    subtotal: 20_000,
                    cart_discount: 1_000,
                    discount_value: 2_900,
                    total_after_discount: 17_100,
                    shipping_cost: 1_500,
                    total: 18_600,
                    coupon: Some(CouponOutcome::Applied { discount: 1_900 }),
                    has_free_shipping: false,
                    shipping_type: Some(ShippingType::Express),
                })
            });

        let body: CartTotalsResponse = TestClient::post("http://example.com/cart/totals")
            .json(&json!({
                "city": "Hawalli",
                "shipping_type": "express",
                "coupon_code": "SAVE10",
            }))
            .send(&make_service(orders))
            .await
            .take_json()
            .await?;

        assert_eq!(body.cart_discount, 1_000);
        assert_eq!(body.discount_value, 2_900);
        assert_eq!(body.total, 18_600);
        assert_eq!(body.shipping_type.as_deref(), Some("express"));
        assert!(body.coupon_message.is_some_and(|m| m.starts_with("Coupon applied")));

        Ok(())
    }

    #[tokio::test]
    async fn test_blank_city_returns_400() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_preview_totals().never();

        let res = TestClient::post("http://example.com/cart/totals")
            .json(&json!({ "city": "" }))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
