//! Payments Config

use std::time::Duration;

use clap::Args;
use dukkan_app::{
    context,
    domain::payments::{GatewaySettings, RedirectUrls},
};
use zeroize::Zeroizing;

/// Payment gateway settings.
#[derive(Debug, Args)]
pub struct PaymentsConfig {
    /// Gateway API base URL
    #[arg(long, env = "PAYMENT_GATEWAY_URL")]
    pub gateway_url: String,

    /// Gateway bearer API key
    #[arg(long, env = "PAYMENT_GATEWAY_API_KEY", hide_env_values = true)]
    pub gateway_api_key: String,

    /// Shared secret for webhook signatures
    #[arg(long, env = "PAYMENT_WEBHOOK_SECRET", hide_env_values = true)]
    pub webhook_secret: String,

    /// Where the gateway returns customers after paying
    #[arg(long, env = "PAYMENT_CALLBACK_URL")]
    pub callback_url: String,

    /// Where the gateway returns customers after a failed payment
    #[arg(long, env = "PAYMENT_ERROR_URL")]
    pub error_url: String,

    /// Gateway request timeout in seconds
    #[arg(long, env = "PAYMENT_GATEWAY_TIMEOUT_SECONDS", default_value_t = 15_u64)]
    pub gateway_timeout_seconds: u64,
}

impl PaymentsConfig {
    #[must_use]
    pub fn settings(&self) -> context::PaymentsConfig {
        context::PaymentsConfig {
            gateway: GatewaySettings {
                base_url: self.gateway_url.clone(),
                api_key: Zeroizing::new(self.gateway_api_key.clone()),
                timeout: Duration::from_secs(self.gateway_timeout_seconds),
            },
            webhook_secret: Zeroizing::new(self.webhook_secret.clone()),
            redirects: RedirectUrls {
                callback_url: self.callback_url.clone(),
                error_url: self.error_url.clone(),
            },
        }
    }
}
