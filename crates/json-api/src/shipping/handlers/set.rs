//! Set Shipping Options Handler

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use tracing::info;

use crate::{
    extensions::*,
    shipping::{
        errors::into_status_error,
        models::{SetShippingRequest, ShippingOptionsResponse},
    },
};

/// Set Shipping Options Handler
///
/// Replaces the city's delivery options. At most one option per type.
#[endpoint(
    tags("shipping"),
    summary = "Set Shipping Options",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Options replaced"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::FORBIDDEN, description = "Admin role required"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    city: PathParam<String>,
    json: JsonBody<SetShippingRequest>,
    depot: &mut Depot,
) -> Result<Json<ShippingOptionsResponse>, StatusError> {
    depot.admin_or_403()?;

    let city = city.into_inner();
    let options = json.validated()?.options.into_iter().map(Into::into).collect();

    let options = depot
        .app()?
        .shipping
        .set_options(&city, options)
        .await
        .map_err(into_status_error)?;

    info!(city, options = options.len(), "shipping options replaced");

    Ok(Json(ShippingOptionsResponse::new(city, options)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use dukkan::shipping::ShippingType;
    use dukkan_app::domain::shipping::{MockShippingService, ShippingServiceError};
    use salvo::test::TestClient;
    use serde_json::json;
    use testresult::TestResult;

    use crate::test_helpers::{admin_service, app_context, customer_service};

    use super::*;

    fn make_service(shipping: MockShippingService) -> Service {
        let mut app = app_context();

        app.shipping = Arc::new(shipping);

        admin_service(app, Router::with_path("shipping/{city}").put(handler))
    }

    fn body() -> serde_json::Value {
        json!({
            "options": [
                { "shipping_type": "standard", "cost": 1_000, "delivery_time": "2-3 days" },
                { "shipping_type": "express", "cost": 2_000, "is_active": false },
            ]
        })
    }

    #[tokio::test]
    async fn test_replaces_options() -> TestResult {
        let mut shipping = MockShippingService::new();

        shipping
            .expect_set_options()
            .once()
            .withf(|city, options| {
                city == "Hawalli"
                    && options.len() == 2
                    && options[0].shipping_type == ShippingType::Standard
                    && options[0].is_active
                    && !options[1].is_active
            })
            .return_once(|_, options| Ok(options));

        let res = TestClient::put("http://example.com/shipping/Hawalli")
            .json(&body())
            .send(&make_service(shipping))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_type_returns_400() -> TestResult {
        let mut shipping = MockShippingService::new();

        shipping.expect_set_options().once().return_once(|_, _| {
            Err(ShippingServiceError::Validation(
                "standard is listed twice".to_owned(),
            ))
        });

        let res = TestClient::put("http://example.com/shipping/Hawalli")
            .json(&body())
            .send(&make_service(shipping))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_customer_gets_403() -> TestResult {
        let res = TestClient::put("http://example.com/shipping/Hawalli")
            .json(&body())
            .send(&customer_service(
                app_context(),
                Router::with_path("shipping/{city}").put(handler),
            ))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
