//! App Context

use std::sync::Arc;

use thiserror::Error;
use zeroize::Zeroizing;

use crate::{
    auth::{AuthService, PgAuthService},
    database::{self, DatabaseSettings, Db},
    domain::{
        addresses::{AddressesService, PgAddressesService},
        carts::{CartsService, PgCartsService},
        catalog::{CatalogService, PgCatalogService},
        notifications::{
            InMemoryPresenceRegistry, NotificationDispatcher, NotificationsService,
            PgNotificationsService, PresenceRegistry,
        },
        offers::{OffersService, PgOffersService},
        orders::{OrdersService, PgOrdersService},
        payments::{
            GatewayError, GatewaySettings, HttpPaymentGateway, PaymentGateway, PaymentsService,
            PgPaymentsService, RedirectUrls,
        },
        products::{PgProductsService, ProductsService},
        shipping::{PgShippingService, ShippingService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to build payment gateway client")]
    Gateway(#[source] GatewayError),
}

/// Payment gateway settings.
#[derive(Debug, Clone)]
pub struct PaymentsConfig {
    pub gateway: GatewaySettings,
    pub webhook_secret: Zeroizing<String>,
    pub redirects: RedirectUrls,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseSettings,
    pub payments: PaymentsConfig,
}

#[derive(Clone)]
pub struct AppContext {
    pub auth: Arc<dyn AuthService>,
    pub products: Arc<dyn ProductsService>,
    pub catalog: Arc<dyn CatalogService>,
    pub offers: Arc<dyn OffersService>,
    pub carts: Arc<dyn CartsService>,
    pub orders: Arc<dyn OrdersService>,
    pub payments: Arc<dyn PaymentsService>,
    pub shipping: Arc<dyn ShippingService>,
    pub addresses: Arc<dyn AddressesService>,
    pub notifications: Arc<dyn NotificationsService>,
    pub presence: Arc<dyn PresenceRegistry>,
}

impl AppContext {
    /// Connect to the database and wire every service.
    ///
    /// # Errors
    ///
    /// Returns an error when the database is unreachable or the gateway
    /// client cannot be built.
    pub async fn from_config(config: AppConfig) -> Result<Self, AppInitError> {
        let pool = database::connect(&config.database)
            .await
            .map_err(AppInitError::Database)?;

        let db = Db::new(pool);

        let gateway: Arc<dyn PaymentGateway> = Arc::new(
            HttpPaymentGateway::new(config.payments.gateway).map_err(AppInitError::Gateway)?,
        );

        let notifications: Arc<dyn NotificationsService> =
            Arc::new(PgNotificationsService::new(db.clone()));
        let presence: Arc<dyn PresenceRegistry> = Arc::new(InMemoryPresenceRegistry::new());
        let dispatcher = NotificationDispatcher::new(notifications.clone(), presence.clone());

        Ok(Self {
            auth: Arc::new(PgAuthService::new(db.clone())),
            products: Arc::new(PgProductsService::new(db.clone())),
            catalog: Arc::new(PgCatalogService::new(db.clone())),
            offers: Arc::new(PgOffersService::new(db.clone())),
            carts: Arc::new(PgCartsService::new(db.clone())),
            orders: Arc::new(PgOrdersService::new(
                db.clone(),
                gateway.clone(),
                config.payments.redirects,
                dispatcher.clone(),
            )),
            payments: Arc::new(PgPaymentsService::new(
                db.clone(),
                gateway,
                dispatcher,
                config.payments.webhook_secret,
            )),
            shipping: Arc::new(PgShippingService::new(db.clone())),
            addresses: Arc::new(PgAddressesService::new(db)),
            notifications,
            presence,
        })
    }
}
