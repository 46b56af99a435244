//! List Products Handler

use dukkan_app::domain::products::models::ProductFilter;
use jiff::Timestamp;
use salvo::{oapi::extract::QueryParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    products::{errors::into_status_error, models::ProductResponse},
};

/// List Products Handler
///
/// Live products, each priced with its best automatic offer. Narrow the
/// listing by any level of the catalog hierarchy.
#[endpoint(
    tags("products"),
    summary = "List Products",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Product list"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    category: QueryParam<Uuid, false>,
    subcategory: QueryParam<Uuid, false>,
    sub_subcategory: QueryParam<Uuid, false>,
    depot: &mut Depot,
) -> Result<Json<Vec<ProductResponse>>, StatusError> {
    let filter = ProductFilter {
        category: category.into_inner(),
        subcategory: subcategory.into_inner(),
        sub_subcategory: sub_subcategory.into_inner(),
    };

    let products = depot
        .app()?
        .products
        .list_products(filter, Timestamp::now())
        .await
        .map_err(into_status_error)?;

    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use dukkan_app::domain::products::{
        MockProductsService, ProductsServiceError,
        models::{PricedProduct, ProductUuid},
    };
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{app_context, customer_service, make_product};

    use super::*;

    fn make_service(products: MockProductsService) -> Service {
        let mut app = app_context();

        app.products = Arc::new(products);

        customer_service(app, Router::with_path("products").get(handler))
    }

    #[tokio::test]
    async fn test_lists_priced_products() -> TestResult {
        let product = make_product(ProductUuid::new());
        let uuid = product.uuid.into_uuid();

        let mut products = MockProductsService::new();

        products
            .expect_list_products()
            .once()
            .withf(|filter, _| *filter == ProductFilter::default())
            .return_once(move |_, _| {
                Ok(vec![PricedProduct {
                    product,
                    price_after_offer: 8_500,
                    applied_offer: None,
                }])
            });

        let body: Vec<ProductResponse> = TestClient::get("http://example.com/products")
            .send(&make_service(products))
            .await
            .take_json()
            .await?;

        assert_eq!(body.len(), 1);
        assert_eq!(body.first().map(|p| p.uuid), Some(uuid));
        assert_eq!(body.first().map(|p| p.price_after_offer), Some(8_500));

        Ok(())
    }

    #[tokio::test]
    async fn test_forwards_category_filter() -> TestResult {
        let category = Uuid::now_v7();

        let mut products = MockProductsService::new();

        products
            .expect_list_products()
            .once()
            .withf(move |filter, _| {
                filter.category == Some(category) && filter.subcategory.is_none()
            })
            .return_once(|_, _| Ok(Vec::new()));

        let res = TestClient::get(format!("http://example.com/products?category={category}"))
            .send(&make_service(products))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_storage_timeout_returns_504() -> TestResult {
        let mut products = MockProductsService::new();

        products
            .expect_list_products()
            .once()
            .return_once(|_, _| Err(ProductsServiceError::Timeout));

        let res = TestClient::get("http://example.com/products")
            .send(&make_service(products))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::GATEWAY_TIMEOUT));

        Ok(())
    }
}
