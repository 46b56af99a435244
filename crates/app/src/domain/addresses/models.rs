//! Address Models

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{auth::UserUuid, uuids::TypedUuid};

/// Address UUID
pub type AddressUuid = TypedUuid<Address>;

/// Delivery location fields, also frozen onto orders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressFields {
    pub label: Option<String>,
    pub city: String,
    pub area: String,
    pub block: String,
    pub street: String,
    pub building: String,
    pub floor: Option<String>,
    pub apartment: Option<String>,
    pub phone: String,
    pub notes: Option<String>,
}

/// Address Model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub uuid: AddressUuid,
    pub user_uuid: UserUuid,
    #[serde(flatten)]
    pub fields: AddressFields,
    pub created_at: Timestamp,
}

/// New Address Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAddress {
    pub uuid: AddressUuid,
    pub fields: AddressFields,
}
