//! Create Product Handler

use dukkan_app::domain::products::models::{NewProduct, ProductUuid};
use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    extensions::*,
    products::{errors::into_status_error, models::ProductResponse},
};

/// Create Product Request
#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub(crate) struct CreateProductRequest {
    pub uuid: Uuid,

    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(length(max = 5000))]
    pub description: Option<String>,

    /// Unit price in fils
    pub price: u64,

    /// Units in stock
    pub quantity: u32,

    pub category_uuid: Uuid,

    pub subcategory_uuid: Uuid,

    pub sub_subcategory_uuid: Option<Uuid>,
}

impl From<CreateProductRequest> for NewProduct {
    fn from(request: CreateProductRequest) -> Self {
        NewProduct {
            uuid: ProductUuid::from_uuid(request.uuid),
            name: request.name,
            description: request.description,
            price: request.price,
            quantity: request.quantity,
            category_uuid: request.category_uuid,
            subcategory_uuid: request.subcategory_uuid,
            sub_subcategory_uuid: request.sub_subcategory_uuid,
        }
    }
}

/// Create Product Handler
#[endpoint(
    tags("products"),
    summary = "Create Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Product created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::FORBIDDEN, description = "Admin role required"),
        (status_code = StatusCode::CONFLICT, description = "Product already exists"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateProductRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ProductResponse>, StatusError> {
    depot.admin_or_403()?;

    let request = json.validated()?;

    let product = depot
        .app()?
        .products
        .create_product(request.into())
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/products/{}", product.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(product.into()))
}
