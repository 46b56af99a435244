//! Shipping request and response models.

use dukkan::shipping::{ShippingOption, ShippingType};
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One delivery option for a city.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ShippingOptionBody {
    /// `standard`, `express` or `same_day`
    #[salvo(schema(value_type = String))]
    pub shipping_type: ShippingType,

    /// Fils
    pub cost: u64,

    /// Free-text estimate such as "2-3 days"
    pub delivery_time: Option<String>,

    #[serde(default = "offered")]
    pub is_active: bool,
}

const fn offered() -> bool {
    true
}

impl From<ShippingOption> for ShippingOptionBody {
    fn from(option: ShippingOption) -> Self {
        Self {
            shipping_type: option.shipping_type,
            cost: option.cost,
            delivery_time: option.delivery_time,
            is_active: option.is_active,
        }
    }
}

impl From<ShippingOptionBody> for ShippingOption {
    fn from(body: ShippingOptionBody) -> Self {
        Self {
            shipping_type: body.shipping_type,
            cost: body.cost,
            delivery_time: body.delivery_time,
            is_active: body.is_active,
        }
    }
}

/// Set Shipping Options Request
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub(crate) struct SetShippingRequest {
    /// Replaces every option for the city
    #[validate(length(min = 1, max = 3))]
    pub options: Vec<ShippingOptionBody>,
}

/// Shipping Options Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ShippingOptionsResponse {
    pub city: String,

    pub options: Vec<ShippingOptionBody>,
}

impl ShippingOptionsResponse {
    pub(crate) fn new(city: String, options: Vec<ShippingOption>) -> Self {
        Self {
            city,
            options: options.into_iter().map(ShippingOptionBody::from).collect(),
        }
    }
}
