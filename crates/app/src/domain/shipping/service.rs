//! Shipping service.

use async_trait::async_trait;
use dukkan::shipping::ShippingOption;
use mockall::automock;
use rustc_hash::FxHashSet;
use tracing::info;

use crate::{
    database::Db,
    domain::shipping::{errors::ShippingServiceError, repository::PgShippingRepository},
};

#[derive(Debug, Clone)]
pub struct PgShippingService {
    db: Db,
    repository: PgShippingRepository,
}

impl PgShippingService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgShippingRepository::new(),
        }
    }
}

fn ensure_distinct_types(options: &[ShippingOption]) -> Result<(), ShippingServiceError> {
    let mut seen = FxHashSet::default();

    for option in options {
        if !seen.insert(option.shipping_type) {
            return Err(ShippingServiceError::Validation(format!(
                "{} is listed more than once",
                option.shipping_type
            )));
        }
    }

    Ok(())
}

#[async_trait]
impl ShippingService for PgShippingService {
    async fn get_options(&self, city: &str) -> Result<Vec<ShippingOption>, ShippingServiceError> {
        let mut tx = self.db.begin().await?;

        let options = self.repository.list_options(&mut tx, city).await?;

        tx.commit().await?;

        if options.is_empty() {
            return Err(ShippingServiceError::NotFound);
        }

        Ok(options)
    }

    #[tracing::instrument(name = "shipping.service.set_options", skip(self, options), err)]
    async fn set_options(
        &self,
        city: &str,
        options: Vec<ShippingOption>,
    ) -> Result<Vec<ShippingOption>, ShippingServiceError> {
        ensure_distinct_types(&options)?;

        let mut tx = self.db.begin().await?;

        self.repository.replace_options(&mut tx, city, &options).await?;

        let stored = self.repository.list_options(&mut tx, city).await?;

        tx.commit().await?;

        info!(count = stored.len(), "replaced shipping options");

        Ok(stored)
    }
}

#[automock]
#[async_trait]
pub trait ShippingService: Send + Sync {
    /// Delivery options for a city.
    async fn get_options(&self, city: &str) -> Result<Vec<ShippingOption>, ShippingServiceError>;

    /// Replace a city's delivery options.
    async fn set_options(
        &self,
        city: &str,
        options: Vec<ShippingOption>,
    ) -> Result<Vec<ShippingOption>, ShippingServiceError>;
}
