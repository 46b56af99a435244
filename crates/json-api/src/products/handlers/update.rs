//! Update Product Handler

use dukkan_app::domain::products::models::{ProductUpdate, ProductUuid};
use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    extensions::*,
    products::{errors::into_status_error, models::ProductResponse},
};

/// Update Product Request
#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub(crate) struct UpdateProductRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(length(max = 5000))]
    pub description: Option<String>,

    /// Unit price in fils
    pub price: u64,

    /// Units in stock
    pub quantity: u32,
}

impl From<UpdateProductRequest> for ProductUpdate {
    fn from(request: UpdateProductRequest) -> Self {
        ProductUpdate {
            name: request.name,
            description: request.description,
            price: request.price,
            quantity: request.quantity,
        }
    }
}

/// Product Update Handler
#[endpoint(
    tags("products"),
    summary = "Update Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Product updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::FORBIDDEN, description = "Admin role required"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    json: JsonBody<UpdateProductRequest>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, StatusError> {
    depot.admin_or_403()?;

    let update = json.validated()?;

    let product = depot
        .app()?
        .products
        .update_product(ProductUuid::from_uuid(product.into_inner()), update.into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(product.into()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use dukkan_app::domain::products::{MockProductsService, ProductsServiceError};
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use crate::test_helpers::{admin_service, app_context, make_product};

    use super::*;

    fn make_service(products: MockProductsService) -> Service {
        let mut app = app_context();

        app.products = Arc::new(products);

        admin_service(app, Router::with_path("products/{product}").put(handler))
    }

    #[tokio::test]
    async fn test_update_product_success() -> TestResult {
        let uuid = ProductUuid::new();
        let mut product = make_product(uuid);
        product.price = 12_500;

        let mut products = MockProductsService::new();

        products
            .expect_update_product()
            .once()
            .withf(move |u, update| {
                *u == uuid
                    && *update
                        == ProductUpdate {
                            name: "Oud candle".to_owned(),
                            description: None,
                            price: 12_500,
                            quantity: 3,
                        }
            })
            .return_once(move |_, _| Ok(product));

        let mut res = TestClient::put(format!("http://example.com/products/{uuid}"))
            .json(&json!({ "name": "Oud candle", "price": 12_500, "quantity": 3 }))
            .send(&make_service(products))
            .await;

        let body: ProductResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.price, 12_500);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_product_returns_404() -> TestResult {
        let mut products = MockProductsService::new();

        products
            .expect_update_product()
            .once()
            .return_once(|_, _| Err(ProductsServiceError::NotFound));

        let res = TestClient::put(format!("http://example.com/products/{}", Uuid::now_v7()))
            .json(&json!({ "name": "Oud candle", "price": 1, "quantity": 1 }))
            .send(&make_service(products))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
