//! Addresses Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::{
    auth::UserUuid,
    domain::addresses::models::{Address, AddressFields, AddressUuid, NewAddress},
};

const LIST_ADDRESSES_SQL: &str = include_str!("sql/list_addresses.sql");
const GET_ADDRESS_SQL: &str = include_str!("sql/get_address.sql");
const CREATE_ADDRESS_SQL: &str = include_str!("sql/create_address.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgAddressesRepository;

impl PgAddressesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_addresses(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<Address>, sqlx::Error> {
        query_as::<Postgres, Address>(LIST_ADDRESSES_SQL)
            .bind(user)
            .fetch_all(&mut **tx)
            .await
    }

    /// An address owned by `user`.
    pub(crate) async fn get_address(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        address: AddressUuid,
    ) -> Result<Address, sqlx::Error> {
        query_as::<Postgres, Address>(GET_ADDRESS_SQL)
            .bind(address)
            .bind(user)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_address(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        address: &NewAddress,
    ) -> Result<Address, sqlx::Error> {
        let fields = &address.fields;

        query_as::<Postgres, Address>(CREATE_ADDRESS_SQL)
            .bind(address.uuid)
            .bind(user)
            .bind(fields.label.as_deref())
            .bind(&fields.city)
            .bind(&fields.area)
            .bind(&fields.block)
            .bind(&fields.street)
            .bind(&fields.building)
            .bind(fields.floor.as_deref())
            .bind(fields.apartment.as_deref())
            .bind(&fields.phone)
            .bind(fields.notes.as_deref())
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Address {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: row.try_get("uuid")?,
            user_uuid: row.try_get("user_uuid")?,
            fields: AddressFields {
                label: row.try_get("label")?,
                city: row.try_get("city")?,
                area: row.try_get("area")?,
                block: row.try_get("block")?,
                street: row.try_get("street")?,
                building: row.try_get("building")?,
                floor: row.try_get("floor")?,
                apartment: row.try_get("apartment")?,
                phone: row.try_get("phone")?,
                notes: row.try_get("notes")?,
            },
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
