//! Offers service.

use async_trait::async_trait;
use dukkan::offers::Offer;
use mockall::automock;
use tracing::info;
use uuid::Uuid;

use crate::{
    database::Db,
    domain::offers::{
        errors::OffersServiceError,
        models::{NewOffer, OfferDetails},
        repository::PgOffersRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgOffersService {
    db: Db,
    repository: PgOffersRepository,
}

impl PgOffersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgOffersRepository::new(),
        }
    }
}

#[async_trait]
impl OffersService for PgOffersService {
    async fn list_offers(&self) -> Result<Vec<Offer>, OffersServiceError> {
        let mut tx = self.db.begin().await?;

        let offers = self.repository.list_offers(&mut tx).await?;

        tx.commit().await?;

        Ok(offers)
    }

    #[tracing::instrument(
        name = "offers.service.create_offer",
        skip(self, offer),
        fields(offer_uuid = %offer.uuid),
        err
    )]
    async fn create_offer(&self, offer: NewOffer) -> Result<Offer, OffersServiceError> {
        offer.details.validate()?;

        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_offer(&mut tx, offer.uuid, &offer.details)
            .await?;

        tx.commit().await?;

        info!(offer_type = created.kind.offer_type(), "created offer");

        Ok(created)
    }

    #[tracing::instrument(name = "offers.service.update_offer", skip(self, details), err)]
    async fn update_offer(
        &self,
        offer: Uuid,
        details: OfferDetails,
    ) -> Result<Offer, OffersServiceError> {
        details.validate()?;

        let mut tx = self.db.begin().await?;

        let updated = self.repository.update_offer(&mut tx, offer, &details).await?;

        tx.commit().await?;

        Ok(updated)
    }

    #[tracing::instrument(name = "offers.service.delete_offer", skip(self), err)]
    async fn delete_offer(&self, offer: Uuid) -> Result<(), OffersServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.delete_offer(&mut tx, offer).await?;

        if rows_affected == 0 {
            return Err(OffersServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait OffersService: Send + Sync {
    /// Every offer that has not been deleted, highest precedence first.
    async fn list_offers(&self) -> Result<Vec<Offer>, OffersServiceError>;

    /// Creates a new offer.
    async fn create_offer(&self, offer: NewOffer) -> Result<Offer, OffersServiceError>;

    /// Replaces an offer's editable fields.
    async fn update_offer(
        &self,
        offer: Uuid,
        details: OfferDetails,
    ) -> Result<Offer, OffersServiceError>;

    /// Soft-deletes an offer and frees its coupon code.
    async fn delete_offer(&self, offer: Uuid) -> Result<(), OffersServiceError>;
}
