//! Delete Offer Handler

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{extensions::*, offers::errors::into_status_error};

/// Delete Offer Handler
///
/// Soft-deletes the offer and frees its coupon code.
#[endpoint(
    tags("offers"),
    summary = "Delete Offer",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Offer deleted"),
        (status_code = StatusCode::FORBIDDEN, description = "Admin role required"),
        (status_code = StatusCode::NOT_FOUND, description = "Offer not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    offer: PathParam<Uuid>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<(), StatusError> {
    depot.admin_or_403()?;

    depot
        .app()?
        .offers
        .delete_offer(offer.into_inner())
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::NO_CONTENT);

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use dukkan_app::domain::offers::{MockOffersService, OffersServiceError};
    use salvo::test::TestClient;
    use testresult::TestResult;

    use crate::test_helpers::{admin_service, app_context};

    use super::*;

    fn make_service(offers: MockOffersService) -> Service {
        let mut app = app_context();

        app.offers = Arc::new(offers);

        admin_service(app, Router::with_path("offers/{offer}").delete(handler))
    }

    #[tokio::test]
    async fn test_delete_returns_204() -> TestResult {
        let uuid = Uuid::now_v7();

        let mut offers = MockOffersService::new();

        offers
            .expect_delete_offer()
            .once()
            .withf(move |u| *u == uuid)
            .return_once(|_| Ok(()));

        let res = TestClient::delete(format!("http://example.com/offers/{uuid}"))
            .send(&make_service(offers))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NO_CONTENT));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_missing_offer_returns_404() -> TestResult {
        let mut offers = MockOffersService::new();

        offers
            .expect_delete_offer()
            .once()
            .return_once(|_| Err(OffersServiceError::NotFound));

        let res = TestClient::delete(format!("http://example.com/offers/{}", Uuid::now_v7()))
            .send(&make_service(offers))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
