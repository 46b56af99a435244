//! Server configuration module

use clap::Parser;

use crate::config::{
    db::DatabaseConfig,
    observability::{LoggingConfig, ObservabilityConfig},
    payments::PaymentsConfig,
    server::ServerRuntimeConfig,
};

pub(crate) mod db;
pub(crate) mod observability;
pub(crate) mod payments;
pub(crate) mod server;

/// Dukkan JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "dukkan-json", about = "Dukkan JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Request observability settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Payment gateway settings.
    #[command(flatten)]
    pub payments: PaymentsConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }

    /// Settings handed to the application context.
    #[must_use]
    pub fn app_config(&self) -> dukkan_app::context::AppConfig {
        dukkan_app::context::AppConfig {
            database: self.database.settings(),
            payments: self.payments.settings(),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn args() -> Vec<&'static str> {
        vec![
            "dukkan-json",
            "--database-url",
            "postgres://localhost/dukkan",
            "--gateway-url",
            "https://gateway.test",
            "--gateway-api-key",
            "key",
            "--webhook-secret",
            "secret",
            "--callback-url",
            "https://shop.test/payments/callback",
            "--error-url",
            "https://shop.test/payments/error",
        ]
    }

    #[test]
    fn defaults_fill_optional_settings() -> TestResult {
        let config = ServerConfig::try_parse_from(args())?;

        assert_eq!(config.socket_addr(), "0.0.0.0:8698");
        assert_eq!(config.database.database_max_connections, 10);
        assert_eq!(config.observability.slow_request_threshold_ms, 1_000);

        Ok(())
    }

    #[test]
    fn app_config_carries_redirects_and_timeouts() -> TestResult {
        let mut args = args();

        args.extend(["--gateway-timeout-seconds", "7"]);

        let app = ServerConfig::try_parse_from(args)?.app_config();

        assert_eq!(app.payments.gateway.timeout.as_secs(), 7);
        assert_eq!(
            app.payments.redirects.error_url,
            "https://shop.test/payments/error"
        );
        assert_eq!(app.database.url, "postgres://localhost/dukkan");

        Ok(())
    }

    #[test]
    fn missing_webhook_secret_is_an_error() {
        let args: Vec<_> = args()
            .into_iter()
            .filter(|arg| *arg != "--webhook-secret" && *arg != "secret")
            .collect();

        assert!(ServerConfig::try_parse_from(args).is_err());
    }
}
