//! Addresses service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    auth::UserUuid,
    database::Db,
    domain::addresses::{
        errors::AddressesServiceError,
        models::{Address, NewAddress},
        repository::PgAddressesRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgAddressesService {
    db: Db,
    repository: PgAddressesRepository,
}

impl PgAddressesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgAddressesRepository::new(),
        }
    }
}

#[async_trait]
impl AddressesService for PgAddressesService {
    async fn list_addresses(&self, user: UserUuid) -> Result<Vec<Address>, AddressesServiceError> {
        let mut tx = self.db.begin().await?;

        let addresses = self.repository.list_addresses(&mut tx, user).await?;

        tx.commit().await?;

        Ok(addresses)
    }

    #[tracing::instrument(name = "addresses.service.create_address", skip(self, address), err)]
    async fn create_address(
        &self,
        user: UserUuid,
        address: NewAddress,
    ) -> Result<Address, AddressesServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_address(&mut tx, user, &address)
            .await?;

        tx.commit().await?;

        Ok(created)
    }
}

#[automock]
#[async_trait]
pub trait AddressesService: Send + Sync {
    /// The caller's saved addresses, newest first.
    async fn list_addresses(&self, user: UserUuid) -> Result<Vec<Address>, AddressesServiceError>;

    /// Save a new address for the caller.
    async fn create_address(
        &self,
        user: UserUuid,
        address: NewAddress,
    ) -> Result<Address, AddressesServiceError>;
}
