//! Payment Methods Handler

use salvo::{oapi::extract::QueryParam, prelude::*};

use crate::{
    extensions::*,
    payments::{errors::into_status_error, models::PaymentMethodResponse},
};

/// Payment Methods Handler
///
/// Ways the gateway offers to pay `amount` fils, with its service charges.
#[endpoint(
    tags("payments"),
    summary = "List Payment Methods",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Payment methods"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Payment gateway failed"),
        (status_code = StatusCode::GATEWAY_TIMEOUT, description = "Payment gateway timed out"),
    ),
)]
pub(crate) async fn handler(
    amount: QueryParam<u64, true>,
    depot: &mut Depot,
) -> Result<Json<Vec<PaymentMethodResponse>>, StatusError> {
    let methods = depot
        .app()?
        .payments
        .payment_methods(amount.into_inner())
        .await
        .map_err(into_status_error)?;

    Ok(Json(methods.into_iter().map(PaymentMethodResponse::from).collect()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use dukkan_app::domain::payments::{
        GatewayError, GatewayPaymentMethod, MockPaymentsService, PaymentsServiceError,
    };
    use rust_decimal::Decimal;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{app_context, customer_service};

    use super::*;

    fn make_service(payments: MockPaymentsService) -> Service {
        let mut app = app_context();

        app.payments = Arc::new(payments);

        customer_service(app, Router::with_path("payments/methods").get(handler))
    }

    #[tokio::test]
    async fn test_lists_gateway_methods() -> TestResult {
        let mut payments = MockPaymentsService::new();

        payments
            .expect_payment_methods()
            .once()
            .withf(|amount| *amount == 12_500)
            .return_once(|_| {
                Ok(vec![GatewayPaymentMethod {
                    id: 2,
                    code: "vm".to_owned(),
                    name: "VISA/MASTER".to_owned(),
                    service_charge: Decimal::new(250, 3),
                    total_amount: Decimal::new(12_750, 3),
                    currency: "KWD".to_owned(),
                }])
            });

        let body: Vec<PaymentMethodResponse> =
            TestClient::get("http://example.com/payments/methods?amount=12500")
                .send(&make_service(payments))
                .await
                .take_json()
                .await?;

        assert_eq!(body.len(), 1);
        assert_eq!(body[0].code, "vm");
        assert_eq!(body[0].total_amount, Decimal::new(12_750, 3));

        Ok(())
    }

    #[tokio::test]
    async fn test_gateway_rejection_returns_502() -> TestResult {
        let mut payments = MockPaymentsService::new();

        payments.expect_payment_methods().once().return_once(|_| {
            Err(PaymentsServiceError::Gateway(GatewayError::Rejected(
                "InvoiceAmount is required".to_owned(),
            )))
        });

        let res = TestClient::get("http://example.com/payments/methods?amount=0")
            .send(&make_service(payments))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_GATEWAY));

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_amount_returns_400() -> TestResult {
        let mut payments = MockPaymentsService::new();

        payments.expect_payment_methods().never();

        let res = TestClient::get("http://example.com/payments/methods")
            .send(&make_service(payments))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
