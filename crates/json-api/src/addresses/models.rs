//! Address request and response models.

use dukkan_app::domain::addresses::models::{Address, AddressFields};
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Delivery location, as saved in the address book and frozen onto orders.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub(crate) struct AddressBody {
    /// Free-text name such as "Home"
    pub label: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub city: String,

    #[validate(length(min = 1, max = 100))]
    pub area: String,

    #[validate(length(min = 1, max = 20))]
    pub block: String,

    #[validate(length(min = 1, max = 200))]
    pub street: String,

    #[validate(length(min = 1, max = 50))]
    pub building: String,

    pub floor: Option<String>,

    pub apartment: Option<String>,

    #[validate(length(min = 5, max = 20))]
    pub phone: String,

    pub notes: Option<String>,
}

impl From<AddressFields> for AddressBody {
    fn from(fields: AddressFields) -> Self {
        Self {
            label: fields.label,
            city: fields.city,
            area: fields.area,
            block: fields.block,
            street: fields.street,
            building: fields.building,
            floor: fields.floor,
            apartment: fields.apartment,
            phone: fields.phone,
            notes: fields.notes,
        }
    }
}

impl From<AddressBody> for AddressFields {
    fn from(body: AddressBody) -> Self {
        Self {
            label: body.label,
            city: body.city,
            area: body.area,
            block: body.block,
            street: body.street,
            building: body.building,
            floor: body.floor,
            apartment: body.apartment,
            phone: body.phone,
            notes: body.notes,
        }
    }
}

/// Address Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddressResponse {
    pub uuid: Uuid,

    #[serde(flatten)]
    pub fields: AddressBody,

    pub created_at: String,
}

impl From<Address> for AddressResponse {
    fn from(address: Address) -> Self {
        Self {
            uuid: address.uuid.into_uuid(),
            fields: address.fields.into(),
            created_at: address.created_at.to_string(),
        }
    }
}
