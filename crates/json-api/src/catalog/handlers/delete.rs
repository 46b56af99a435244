//! Delete Catalog Entry Handler

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use dukkan_app::domain::catalog::models::CascadeSummary;

use crate::{catalog::errors::into_status_error, extensions::*};

use super::parse_kind;

/// Rows soft-deleted at each level.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CascadeDeleteResponse {
    pub categories: u64,
    pub subcategories: u64,
    pub sub_subcategories: u64,
    pub products: u64,
}

impl From<CascadeSummary> for CascadeDeleteResponse {
    fn from(summary: CascadeSummary) -> Self {
        Self {
            categories: summary.categories,
            subcategories: summary.subcategories,
            sub_subcategories: summary.sub_subcategories,
            products: summary.products,
        }
    }
}

/// Delete Catalog Entry Handler
///
/// Soft-deletes the entry and everything beneath it.
#[endpoint(
    tags("catalog"),
    summary = "Delete Catalog Entry",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Entry and descendants deleted"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unknown catalog level"),
        (status_code = StatusCode::FORBIDDEN, description = "Admin role required"),
        (status_code = StatusCode::NOT_FOUND, description = "Entry not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    kind: PathParam<String>,
    uuid: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CascadeDeleteResponse>, StatusError> {
    let admin = depot.admin_or_403()?;
    let kind = parse_kind(&kind.into_inner())?;
    let uuid = uuid.into_inner();

    let summary = depot
        .app()?
        .catalog
        .cascade_delete(kind, uuid)
        .await
        .map_err(into_status_error)?;

    info!(
        %kind,
        %uuid,
        admin = %admin.user_uuid,
        products = summary.products,
        "catalog entry deleted"
    );

    Ok(Json(summary.into()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use dukkan_app::domain::catalog::{
        CatalogServiceError, MockCatalogService, models::CatalogKind,
    };
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{admin_service, app_context, customer_service};

    use super::*;

    fn route() -> Router {
        Router::with_path("catalog/{kind}/{uuid}").delete(handler)
    }

    #[tokio::test]
    async fn test_category_delete_reports_counts() -> TestResult {
        let uuid = Uuid::now_v7();

        let mut catalog = MockCatalogService::new();

        catalog
            .expect_cascade_delete()
            .once()
            .withf(move |kind, u| *kind == CatalogKind::Category && *u == uuid)
            .return_once(|_, _| {
                Ok(CascadeSummary {
                    categories: 1,
                    subcategories: 2,
                    sub_subcategories: 3,
                    products: 7,
                })
            });

        let mut app = app_context();
        app.catalog = Arc::new(catalog);

        let body: CascadeDeleteResponse =
            TestClient::delete(format!("http://example.com/catalog/category/{uuid}"))
                .send(&admin_service(app, route()))
                .await
                .take_json()
                .await?;

        assert_eq!(body.subcategories, 2);
        assert_eq!(body.products, 7);

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_entry_returns_404() -> TestResult {
        let mut catalog = MockCatalogService::new();

        catalog
            .expect_cascade_delete()
            .once()
            .return_once(|_, _| Err(CatalogServiceError::NotFound));

        let mut app = app_context();
        app.catalog = Arc::new(catalog);

        let res = TestClient::delete(format!(
            "http://example.com/catalog/product/{}",
            Uuid::now_v7()
        ))
        .send(&admin_service(app, route()))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_customer_gets_403() -> TestResult {
        let res = TestClient::delete(format!(
            "http://example.com/catalog/category/{}",
            Uuid::now_v7()
        ))
        .send(&customer_service(app_context(), route()))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
